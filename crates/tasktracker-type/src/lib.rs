pub mod auth;
pub mod profile;
pub mod tag;
pub mod task;
pub mod user;

/// Rejects strings that are empty or consist of whitespace only
#[allow(clippy::trivially_copy_pass_by_ref)] // garde requirement
fn not_blank(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }

    Ok(())
}
