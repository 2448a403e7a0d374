//! Built-in airline reservation scenario.

use crate::domain::models::TestCase;

pub const SAMPLE_RULES: &str = "
- Passengers: Each reservation can have at most five passengers. The agent needs to collect the first name, last name, and date of birth for each passenger. All passengers must fly the same flights in the same cabin.
- Payment: each reservation can use at most one travel certificate, at most one credit card, and at most three gift cards. The remaining amount of a travel certificate is not refundable. All payment methods must already be in user profile for safety reasons.
- Checked bag allowance: If the booking user is a regular member, 0 free checked bag for each basic economy passenger, 1 free checked bag for each economy passenger, and 2 free checked bags for each business passenger. If the booking user is a silver member, 1 free checked bag for each basic economy passenger, 2 free checked bag for each economy passenger, and 3 free checked bags for each business passenger. If the booking user is a gold member, 2 free checked bag for each basic economy passenger, 3 free checked bag for each economy passenger, and 3 free checked bags for each business passenger. Each extra baggage is 50 dollars.";

pub fn sample_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Passengers",
            "Verify that a reservation with the following three passengers: \
John Doe (born 1990-01-01), Jane Doe (born 1991-02-02), and Alice Smith (born 1992-03-03) \
satisfies the rule that a reservation can include at most five passengers with complete first name, \
last name, and date of birth information, and that they are on the same flights and cabin. \
Return the query to check for valid passengers.",
        ),
        TestCase::new(
            "Payment",
            "Check that a reservation that uses 0 travel certificates, 1 credit card, and 2 gift cards \
is valid according to the payment rules.",
        ),
        TestCase::new(
            "Baggage Fee",
            "Determine the baggage fee for a silver member traveling as an economy passenger who has booked 4 checked bags \
according to the baggage rules.",
        ),
        TestCase::new(
            "Combined Positive",
            "Verify that a reservation with the following three passengers: \
Alice Johnson (born 1985-07-07), Bob Smith (born 1986-08-08), and Carol Danvers (born 1987-09-09) \
who are all booked on flight AA101 in Economy cabin, uses 0 travel certificates, 1 credit card, and 3 gift cards \
and that for a silver member traveling in Economy, booking total of 5 checked bags, \
Return the combined query to check for valid passengers, valid payment, and the proper baggage fee.",
        ),
        TestCase::new(
            "Combined Negative",
            "Check that a reservation with the following six passengers: \
   1) John Doe (born 1990-01-01), \
   2) Jane Doe (born 1991-02-02), \
   3) Alice Smith (born 1992-03-03), \
   4) Bob Brown (born 1993-04-04), \
   5) Carol White (born 1994-05-05), \
   6) David Black (missing date of birth), \
all booked on flight AA202 in Business cabin, uses 2 travel certificates, 1 credit card, and 4 gift cards, \
and that for a regular member traveling in Business, booking total of 6 checked bags, \
Return the combined query to check for valid passengers, valid payment, and the proper baggage fee.",
        ),
    ]
}
