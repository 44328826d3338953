use crate::entry::Entry;
use crate::error::DecodeError;

/// Visits decoded entries in order, calling `visit` for each. If `visit`
/// returns an error the walk stops immediately and that error is returned
/// (spec.md §4.1: "`fn` receiving an error MUST cause the walk to stop and
/// return that error"). A decode error from the underlying reader is
/// likewise propagated without visiting further entries.
pub fn each_entry<I, F>(entries: I, mut visit: F) -> Result<(), DecodeError>
where
    I: IntoIterator<Item = Result<Entry, DecodeError>>,
    F: FnMut(Entry) -> Result<(), DecodeError>,
{
    for result in entries {
        visit(result?)?;
    }
    Ok(())
}
