use super::LinkEntry;

/// Orders entries newest first.
///
/// Entries with the same `updated` instant keep their extraction order
/// (`ordinal`), so the output is the same for any permutation of the same
/// input. That matters after resolution, which hands entries back in
/// completion order.
pub fn sequence(mut entries: Vec<LinkEntry>) -> Vec<LinkEntry> {
    entries.sort_by(|a, b| {
        b.updated()
            .cmp(&a.updated())
            .then_with(|| a.ordinal().cmp(&b.ordinal()))
    });
    entries
}
