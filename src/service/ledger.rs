//! Checks shared by income and contribution submission.

use crate::{
    access::policy,
    domain::{LedgerEntryRequest, NewLedgerEntry, User},
    error::{AppError, FieldErrors, Result},
    repository::CooperativeRepository,
};

const REQUIRED: &str = "This field is required.";

/// Turns a client payload into a row owned by `actor`. `noun` names the record
/// kind in messages ("income", "contributions").
pub async fn validate_entry(
    actor: &User,
    request: LedgerEntryRequest,
    cooperatives: &dyn CooperativeRepository,
    noun: &str,
) -> Result<NewLedgerEntry> {
    policy::may_create_ledger_entry(actor)?;

    let mut errors = FieldErrors::new();
    let parsed = request.parse_fields(&mut errors);

    if request.date.as_ref().map_or(true, |v| v.is_null()) {
        errors.add("date", REQUIRED);
    }
    if request.amount.as_ref().map_or(true, |v| v.is_null()) {
        errors.add("amount", REQUIRED);
    }

    let cooperative_id = match parsed.cooperative {
        None => {
            if request.cooperative.as_ref().map_or(true, |v| v.is_null()) {
                errors.add("cooperative", REQUIRED);
            }
            None
        }
        Some(requested) => match cooperatives.membership_for(actor.id).await? {
            None => {
                errors.add(
                    "cooperative",
                    format!("You have no cooperative membership. Only riders can create {}.", noun),
                );
                None
            }
            Some(m) if m.cooperative_id != requested => {
                errors.add(
                    "cooperative",
                    format!("You can only create {} for your own cooperative.", noun),
                );
                None
            }
            Some(m) => Some(m.cooperative_id),
        },
    };

    errors.into_result()?;

    match (cooperative_id, parsed.date, parsed.amount) {
        (Some(cooperative_id), Some(date), Some(amount)) => Ok(NewLedgerEntry {
            rider_id: actor.id,
            cooperative_id,
            date,
            amount,
        }),
        _ => Err(AppError::Internal("Ledger entry validation fell through".to_string())),
    }
}
