//! The AeroConnect supplier selection study.
//!
//! Respondents pick a supplier for avionics control units and answer
//! follow-up questions. Variant A uses neutral (control) wording, variant B
//! frames the same questions around reliability risk.

use questionnaire::{
    AllocationGroup, AnswerStore, PageRule, PageSpec, QuestionId, QuestionSpec, Questionnaire,
};

pub const FIRST_NAME: &str = "first_name";
pub const NAME_REQUIRED: &str = "First Name is mandatory. Please fill it before proceeding.";
pub const ALLOCATION_GROUP: &str = "Q3";
pub const SUPPLIERS: [&str; 3] = ["Supplier A", "Supplier B", "Supplier C"];
pub const IMPORTANCE_FACTORS: [&str; 7] = [
    "Initial price",
    "Reliability",
    "Lead time",
    "Lead variability",
    "Minimum order",
    "Certification",
    "Warranty",
];

const AGREE_SCALE: &str = " (1 = Strongly Disagree, 5 = Strongly Agree)";

pub const SCENARIO: &str = "\
AeroConnect Airlines operates 45 commercial aircraft and plans to add 8 more within the next \
18 months. The contract with its current supplier of Avionics Control Units expires in 60 days. \
As the procurement specialist, evaluate the three suppliers below and make a recommendation. \
The airline needs approximately 120 units annually.";

pub const SUPPLIER_TABLE: &str = "\
Feature                 | Supplier A                      | Supplier B                       | Supplier C
Price                   | $8,750/unit (25% above market)  | $7,000/unit (Industry Benchmark) | $9,800/unit (40% above market)
Lead Time               | 18 days (±4 days)               | 20 days (±7 days)                | 15 days (±2 days)
Reliability             | 97% defect-free                 | 95% defect-free                  | 99% defect-free
Minimum Order Quantity  | 15 units                        | 10 units                         | 20 units
Additional              | FAA-certified, 5-year warranty  | ISO 9001, 2-year warranty        | 7 of top 10 airlines, 7-year warranty";

/// The scenario followed by the supplier comparison.
pub fn prelude() -> String {
    format!("{SCENARIO}\n\n{SUPPLIER_TABLE}")
}

const EPILOGUE: &str = "Survey submitted successfully! Thank you for your participation.";

/// Which wording a page sequence uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wording {
    Control,
    Bias,
}

/// Pages 1-3: identity, supplier decision and attitude statements.
pub fn pilot() -> Questionnaire {
    Questionnaire::with_variants(
        "supplier-selection/pilot",
        FIRST_NAME,
        pilot_pages(Wording::Control),
        pilot_pages(Wording::Bias),
    )
    .with_group(allocation_group())
    .with_prelude(prelude())
    .with_epilogue(EPILOGUE)
}

/// All five pages, Q1 to Q14.
pub fn full() -> Questionnaire {
    let pages = |wording: Wording| {
        let mut pages = pilot_pages(wording);
        pages.push(trade_off_page());
        pages.push(commitment_page());
        pages
    };
    Questionnaire::with_variants(
        "supplier-selection/full",
        FIRST_NAME,
        pages(Wording::Control),
        pages(Wording::Bias),
    )
    .with_group(allocation_group())
    .with_prelude(prelude())
    .with_epilogue(EPILOGUE)
}

/// An empty or well-formed email address.
pub fn validate_email(answers: &AnswerStore) -> Result<(), String> {
    let Ok(email) = answers.get_text(&QuestionId::new("email")) else {
        return Ok(());
    };
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }
    if !email.contains('@') || !email.split('@').next_back().is_some_and(|d| d.contains('.')) {
        return Err("Enter a valid email (e.g., you@example.com)".into());
    }
    Ok(())
}

fn pilot_pages(wording: Wording) -> Vec<PageSpec> {
    vec![identity_page(), decision_page(wording), attitude_page(wording)]
}

fn identity_page() -> PageSpec {
    PageSpec::new(
        "Page 1",
        vec![
            QuestionSpec::free_text(FIRST_NAME, "First Name (*)"),
            QuestionSpec::free_text("last_name", "Last Name"),
            QuestionSpec::free_text("email", "Email"),
            QuestionSpec::single_choice(
                "designation",
                "Designation",
                [
                    "1. Director/Manager",
                    "2. Professor/Researcher",
                    "3. Student",
                    "4. Consultant/Entry Level",
                ],
            ),
        ],
    )
    .with_rule(PageRule::required(FIRST_NAME, NAME_REQUIRED))
    .with_rule(PageRule::Custom(validate_email))
}

fn decision_page(wording: Wording) -> PageSpec {
    let confidence = match wording {
        Wording::Control => {
            "Q2. Rate your confidence in this decision (1 = Not Confident at all, 10 = Extremely Confident)"
        }
        Wording::Bias => {
            "Q2. Rate your confidence in this decision, considering the potential impact on aircraft availability (1 = Not at all confident, 10 = Extremely confident)"
        }
    };

    PageSpec::new(
        "Page 2",
        vec![
            QuestionSpec::single_choice(
                "Q1",
                "Q1. Based on the information provided, which supplier would you select for AeroConnect Airlines?",
                SUPPLIERS,
            ),
            QuestionSpec::scale("Q2", confidence, 1, 10),
            QuestionSpec::allocation("supplier_a", "Supplier A: in %", ALLOCATION_GROUP),
            QuestionSpec::allocation("supplier_b", "Supplier B: in %", ALLOCATION_GROUP),
            QuestionSpec::allocation("supplier_c", "Supplier C: in %", ALLOCATION_GROUP),
        ],
    )
    .with_note(allocation_prompt(wording))
    .with_rule(PageRule::balanced(ALLOCATION_GROUP))
}

fn attitude_page(wording: Wording) -> PageSpec {
    let statements = match wording {
        Wording::Control => [
            "Q4. I believe selecting a supplier with a lower reliability poses a risk to AeroConnect's operations.",
            "Q5. I am concerned about potential hidden costs that might arise from selecting the lowest-price supplier.",
            "Q6. I would rather pay more upfront for avionics units than risk unexpected costs later.",
            "Q7. I am comfortable with longer and more variable lead times if it results in significant cost savings.",
        ],
        Wording::Bias => [
            "Q4. Selecting a supplier with lower reliability exposes AeroConnect to significant operational disruptions, potential regulatory scrutiny, and passenger compensation claims.",
            "Q5. The hidden costs from selecting the lowest-price supplier (emergency shipments, flight cancellations, maintenance complications) often exceed the initial savings.",
            "Q6. Paying more upfront for quality avionics units protects against costly flight cancellations, emergency maintenance, and damage to AeroConnect's safety reputation.",
            "Q7. Longer and variable lead times increase the risk of grounded aircraft and lost revenue when unexpected maintenance needs arise.",
        ],
    };

    let questions = statements
        .iter()
        .zip(["Q4", "Q5", "Q6", "Q7"])
        .map(|(statement, id)| QuestionSpec::scale(id, format!("{statement}{AGREE_SCALE}"), 1, 5))
        .collect();
    PageSpec::new("Page 3", questions)
}

fn trade_off_page() -> PageSpec {
    PageSpec::new(
        "Page 4",
        vec![
            QuestionSpec::single_choice(
                "Q8",
                "Q8. If Supplier B improved their reliability rating to 97% but increased their price by 10%, would you change your original supplier selection? (Note- Each 1% decrease in reliability has historically corresponded to a 15% increase in maintenance issues)",
                [
                    "Yes, I would switch to Supplier B",
                    "No, I would stay with my original choice",
                    "I originally chose Supplier B and would still choose them",
                ],
            ),
            QuestionSpec::single_choice(
                "Q9",
                "Q9. What is the minimum reliability percentage you would consider acceptable? (Each reliability percentage point below 99% correlates with approximately 3 additional flight cancellations per year)",
                ["99% or higher", "97-98%", "95-96%", "90-94%", "Below 90%"],
            ),
            QuestionSpec::single_choice(
                "Q10",
                "Q10. If a delivery delay grounds aircraft and disrupts operations, which option would you prefer?",
                [
                    "Pay a 35% premium for emergency shipments",
                    "Cancel revenue-generating flights until delivery",
                    "Maintain a larger safety stock (20% increase in inventory costs)",
                ],
            ),
            QuestionSpec::importance_matrix(
                "Q11",
                "Q11. Rate the importance of each factor in your supplier selection decision: (1 = Not Important, 5 = Extremely Important)",
                IMPORTANCE_FACTORS,
            ),
            QuestionSpec::single_choice(
                "Q12",
                "Q12. Which attribute would you be most willing to compromise on to improve reliability by 2%?",
                [
                    "Price",
                    "Lead time",
                    "Lead time variability",
                    "Minimum order quantity",
                    "Warranty period",
                ],
            ),
        ],
    )
}

fn commitment_page() -> PageSpec {
    PageSpec::new(
        "Page 5",
        vec![
            QuestionSpec::single_choice(
                "Q13",
                "Q13. Would you be willing to commit to a 2-year contract with your chosen supplier in exchange for a 12% price reduction? (Note- This would protect against any potential future price increases due to market volatility)",
                ["Yes", "No", "Unsure"],
            ),
            QuestionSpec::single_choice(
                "Q14",
                "Q14. How much would you be willing to invest in additional quality testing equipment that could detect potential defects before installation?",
                [
                    "$0 (not willing to invest)",
                    "Up to $50,000",
                    "$50,001 - $100,000",
                    "$100,001 - $200,000",
                    "Over $200,000",
                ],
            ),
        ],
    )
}

/// The Q3 question text, shown above the three allocation sliders.
fn allocation_prompt(wording: Wording) -> &'static str {
    match wording {
        Wording::Control => {
            "Q3. If you had to distribute AeroConnect's annual orders across these suppliers, what % would you allocate to each? (Total % must equal 100)"
        }
        Wording::Bias => {
            "Q3. If you had to distribute AeroConnect's annual orders to manage supply risk, what percentage would you allocate to each supplier? (Total must equal 100%)"
        }
    }
}

fn allocation_group() -> AllocationGroup {
    AllocationGroup::new(
        ALLOCATION_GROUP,
        [
            QuestionId::new("supplier_a"),
            QuestionId::new("supplier_b"),
            QuestionId::new("supplier_c"),
        ],
    )
}
