//! Match builder (component D) and boot filter (component E).
//!
//! Composes the disjunctive/conjunctive match predicates that address all
//! journal entries belonging to a given unit, and the `_BOOT_ID=`
//! conjunction that narrows any predicate down to the current boot.

use crate::errors::SdError;
use crate::id128::Id128;
use crate::reader::JournalReader;

/// `sd-journal`'s well-known coredump message identifier
/// (`MESSAGE_ID=fc2e22bc6ee647b6b90729ab34a250b1`), used to recognize
/// coredump entries logged on a unit's behalf.
const COREDUMP_MESSAGE_ID: &str = "fc2e22bc6ee647b6b90729ab34a250b1";

/// Appends the match predicate addressing a system unit's log entries:
///
/// ```text
/// (_SYSTEMD_UNIT=<unit>)
/// ∨ (MESSAGE_ID=<coredump> ∧ _UID=0 ∧ COREDUMP_UNIT=<unit>)
/// ∨ (_PID=1 ∧ UNIT=<unit>)
/// ∨ (_UID=0 ∧ OBJECT_SYSTEMD_UNIT=<unit>)
/// ```
///
/// Predicates are emitted to `reader` in strict left-to-right order.
pub fn add_matches_for_unit<R: JournalReader + ?Sized>(
    reader: &mut R,
    unit: &str,
) -> Result<(), SdError> {
    // Messages from the service itself.
    reader.add_match(format!("_SYSTEMD_UNIT={}", unit).as_bytes())?;

    // Coredumps of the service.
    reader.add_disjunction()?;
    reader.add_match(format!("MESSAGE_ID={}", COREDUMP_MESSAGE_ID).as_bytes())?;
    reader.add_match(b"_UID=0")?;
    reader.add_match(format!("COREDUMP_UNIT={}", unit).as_bytes())?;

    // Messages from PID 1 about this service.
    reader.add_disjunction()?;
    reader.add_match(b"_PID=1")?;
    reader.add_match(format!("UNIT={}", unit).as_bytes())?;

    // Messages from authorized daemons about this service.
    reader.add_disjunction()?;
    reader.add_match(b"_UID=0")?;
    reader.add_match(format!("OBJECT_SYSTEMD_UNIT={}", unit).as_bytes())?;

    Ok(())
}

/// Appends the match predicate addressing a user unit's log entries,
/// analogous to [`add_matches_for_unit`] but using the `_USER_UNIT`
/// field family and conjoining every disjunct with `_UID=<uid>`.
pub fn add_matches_for_user_unit<R: JournalReader + ?Sized>(
    reader: &mut R,
    unit: &str,
    uid: u32,
) -> Result<(), SdError> {
    let muid = format!("_UID={}", uid);

    // Messages from the user service itself.
    reader.add_match(format!("_SYSTEMD_USER_UNIT={}", unit).as_bytes())?;
    reader.add_match(muid.as_bytes())?;

    // Messages from systemd about this service.
    reader.add_disjunction()?;
    reader.add_match(format!("USER_UNIT={}", unit).as_bytes())?;
    reader.add_match(muid.as_bytes())?;

    // Coredumps of the service.
    reader.add_disjunction()?;
    reader.add_match(format!("COREDUMP_USER_UNIT={}", unit).as_bytes())?;
    reader.add_match(muid.as_bytes())?;
    reader.add_match(b"_UID=0")?;

    // Messages from authorized daemons about this service.
    reader.add_disjunction()?;
    reader.add_match(format!("OBJECT_SYSTEMD_USER_UNIT={}", unit).as_bytes())?;
    reader.add_match(muid.as_bytes())?;
    reader.add_match(b"_UID=0")?;

    Ok(())
}

/// Appends `_BOOT_ID=<current boot id>` and ANDs it against every
/// disjunct added so far, narrowing a unit predicate down to the
/// currently running boot.
pub fn add_match_this_boot<R: JournalReader + ?Sized>(reader: &mut R) -> Result<(), SdError> {
    let boot_id = Id128::from_boot()?;
    reader.add_match(format!("_BOOT_ID={}", boot_id.lower_hex()).as_bytes())?;
    reader.add_conjunction()?;
    Ok(())
}
