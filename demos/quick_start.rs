/// quick start - evaluate an advance and print a loan schedule
use salary_loan_calc::{AdvanceCalculator, AdvanceRequest, LoanCalculator, LoanRequest, Money};
use salary_loan_calc::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a monthly earner asking for 150,000 UGX against a 750,000 salary
    let advance = AdvanceCalculator::default().evaluate(&AdvanceRequest {
        gross_salary: Money::from_major(750_000),
        advance_amount: Money::from_major(150_000),
        currency: "UGX".to_string(),
        pay_frequency: "Month".to_string(),
    })?;
    println!("{}", serde_json::to_string_pretty(&advance)?);

    // 500,000 over 6 months at 15% a year
    let loan = LoanCalculator::default().calculate(&LoanRequest {
        loan_amount: Money::from_major(500_000),
        interest_rate: Decimal::from(15),
        loan_term: 6,
        currency: "UGX".to_string(),
        start_date: None,
    })?;

    println!("EMI {} / total {}", loan.emi, loan.total_repayable);
    for row in &loan.schedule {
        println!(
            "{:>3} {:>12} {:>12} {:>12} {:>12}",
            row.month, row.installment, row.principal_portion, row.interest_portion, row.remaining_balance
        );
    }

    Ok(())
}
