//! Allowance and deduction maintenance.
//!
//! An employee holds at most one allowance and one deduction per type
//! name, and amounts are never negative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Allowance, AmountType, Deduction};
use crate::store::HrmStore;

/// Fields of an allowance or deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationInput {
    /// The employee the row belongs to.
    pub employee_id: u64,
    /// Type name, unique per employee.
    pub type_name: String,
    /// How `amount` is interpreted.
    pub amount_type: AmountType,
    /// Currency value or percentage.
    pub amount: Decimal,
}

/// Creates an allowance.
pub fn create_allowance<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    input: CompensationInput,
) -> EngineResult<Allowance> {
    validate_input(store, employer_id, &input)?;
    let existing = store.allowances(employer_id, input.employee_id)?;
    ensure_unique_type("allowance", &input, existing.iter().map(|a| (a.id, &a.type_name)), None)?;

    let allowance = store.insert_allowance(Allowance {
        id: 0,
        employer_id,
        employee_id: input.employee_id,
        type_name: input.type_name,
        amount_type: input.amount_type,
        amount: input.amount,
    })?;
    info!(
        employer_id,
        employee_id = allowance.employee_id,
        allowance_id = allowance.id,
        type_name = %allowance.type_name,
        "Allowance created"
    );
    Ok(allowance)
}

/// Replaces an allowance's fields.
pub fn update_allowance<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    allowance_id: u64,
    input: CompensationInput,
) -> EngineResult<Allowance> {
    store
        .allowance(employer_id, allowance_id)?
        .ok_or(EngineError::NotFound {
            entity: "allowance",
            id: allowance_id,
        })?;
    validate_input(store, employer_id, &input)?;
    let existing = store.allowances(employer_id, input.employee_id)?;
    ensure_unique_type(
        "allowance",
        &input,
        existing.iter().map(|a| (a.id, &a.type_name)),
        Some(allowance_id),
    )?;

    let allowance = Allowance {
        id: allowance_id,
        employer_id,
        employee_id: input.employee_id,
        type_name: input.type_name,
        amount_type: input.amount_type,
        amount: input.amount,
    };
    store.update_allowance(&allowance)?;
    info!(employer_id, allowance_id, "Allowance updated");
    Ok(allowance)
}

/// Creates a deduction.
pub fn create_deduction<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    input: CompensationInput,
) -> EngineResult<Deduction> {
    validate_input(store, employer_id, &input)?;
    let existing = store.deductions(employer_id, input.employee_id)?;
    ensure_unique_type("deduction", &input, existing.iter().map(|d| (d.id, &d.type_name)), None)?;

    let deduction = store.insert_deduction(Deduction {
        id: 0,
        employer_id,
        employee_id: input.employee_id,
        type_name: input.type_name,
        amount_type: input.amount_type,
        amount: input.amount,
    })?;
    info!(
        employer_id,
        employee_id = deduction.employee_id,
        deduction_id = deduction.id,
        type_name = %deduction.type_name,
        "Deduction created"
    );
    Ok(deduction)
}

/// Replaces a deduction's fields.
pub fn update_deduction<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    deduction_id: u64,
    input: CompensationInput,
) -> EngineResult<Deduction> {
    store
        .deduction(employer_id, deduction_id)?
        .ok_or(EngineError::NotFound {
            entity: "deduction",
            id: deduction_id,
        })?;
    validate_input(store, employer_id, &input)?;
    let existing = store.deductions(employer_id, input.employee_id)?;
    ensure_unique_type(
        "deduction",
        &input,
        existing.iter().map(|d| (d.id, &d.type_name)),
        Some(deduction_id),
    )?;

    let deduction = Deduction {
        id: deduction_id,
        employer_id,
        employee_id: input.employee_id,
        type_name: input.type_name,
        amount_type: input.amount_type,
        amount: input.amount,
    };
    store.update_deduction(&deduction)?;
    info!(employer_id, deduction_id, "Deduction updated");
    Ok(deduction)
}

fn validate_input<S: HrmStore + ?Sized>(
    store: &S,
    employer_id: u64,
    input: &CompensationInput,
) -> EngineResult<()> {
    store.require_employee(employer_id, input.employee_id)?;
    if input.amount < Decimal::ZERO {
        return Err(EngineError::InvalidAmount {
            field: "amount",
            value: input.amount,
        });
    }
    Ok(())
}

/// Rejects `input` if another row of the employee (other than `own_id`) has its type name.
fn ensure_unique_type<'a>(
    kind: &'static str,
    input: &CompensationInput,
    mut existing: impl Iterator<Item = (u64, &'a String)>,
    own_id: Option<u64>,
) -> EngineResult<()> {
    let taken = existing.any(|(id, type_name)| Some(id) != own_id && *type_name == input.type_name);
    if taken {
        return Err(EngineError::DuplicateCompensationType {
            employee_id: input.employee_id,
            kind,
            type_name: input.type_name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;
    use crate::store::InMemoryStore;
    use std::str::FromStr;

    const EMPLOYER: u64 = 1;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn setup() -> (InMemoryStore, u64) {
        let mut store = InMemoryStore::new();
        let employee = store.add_employee(Employee {
            id: 0,
            employer_id: EMPLOYER,
            name: "Ada".to_string(),
            shift_id: None,
            basic_salary: Some(dec("3000")),
            rate_per_hour: None,
        });
        (store, employee.id)
    }

    fn input(employee_id: u64, type_name: &str, amount: &str) -> CompensationInput {
        CompensationInput {
            employee_id,
            type_name: type_name.to_string(),
            amount_type: AmountType::Fixed,
            amount: dec(amount),
        }
    }

    #[test]
    fn test_create_allowance() {
        let (mut store, employee) = setup();
        let allowance = create_allowance(&mut store, EMPLOYER, input(employee, "Housing", "200")).unwrap();
        assert_eq!(allowance.id, 1);
        assert_eq!(store.allowances(EMPLOYER, employee).unwrap(), vec![allowance]);
    }

    #[test]
    fn test_duplicate_allowance_type_rejected() {
        let (mut store, employee) = setup();
        create_allowance(&mut store, EMPLOYER, input(employee, "Housing", "200")).unwrap();

        let result = create_allowance(&mut store, EMPLOYER, input(employee, "Housing", "50"));
        assert!(matches!(
            result,
            Err(EngineError::DuplicateCompensationType { kind: "allowance", .. })
        ));
    }

    #[test]
    fn test_same_type_allowed_as_allowance_and_deduction() {
        let (mut store, employee) = setup();
        create_allowance(&mut store, EMPLOYER, input(employee, "Transport", "100")).unwrap();
        assert!(create_deduction(&mut store, EMPLOYER, input(employee, "Transport", "20")).is_ok());
    }

    #[test]
    fn test_update_keeps_own_type_name() {
        let (mut store, employee) = setup();
        let deduction =
            create_deduction(&mut store, EMPLOYER, input(employee, "Pension", "50")).unwrap();

        let updated =
            update_deduction(&mut store, EMPLOYER, deduction.id, input(employee, "Pension", "75"))
                .unwrap();
        assert_eq!(updated.amount, dec("75"));
        assert_eq!(
            store.deduction(EMPLOYER, deduction.id).unwrap().unwrap().amount,
            dec("75")
        );
    }

    #[test]
    fn test_update_onto_taken_type_rejected() {
        let (mut store, employee) = setup();
        create_deduction(&mut store, EMPLOYER, input(employee, "Pension", "50")).unwrap();
        let union = create_deduction(&mut store, EMPLOYER, input(employee, "Union", "10")).unwrap();

        let result =
            update_deduction(&mut store, EMPLOYER, union.id, input(employee, "Pension", "10"));
        assert!(matches!(
            result,
            Err(EngineError::DuplicateCompensationType { kind: "deduction", .. })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (mut store, employee) = setup();
        let result = create_allowance(&mut store, EMPLOYER, input(employee, "Housing", "-1"));
        assert!(matches!(result, Err(EngineError::InvalidAmount { .. })));
    }

    #[test]
    fn test_unknown_employee_and_row() {
        let (mut store, employee) = setup();
        assert!(matches!(
            create_allowance(&mut store, EMPLOYER, input(42, "Housing", "1")),
            Err(EngineError::NotFound { entity: "employee", .. })
        ));
        assert!(matches!(
            update_allowance(&mut store, EMPLOYER, 9, input(employee, "Housing", "1")),
            Err(EngineError::NotFound { entity: "allowance", id: 9 })
        ));
    }
}
