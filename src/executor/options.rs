//! Aggregate option merging
//!
//! Callers may supply several `AggregateOptions` values; the driver takes one.
//! Later values win field by field.

use mongodb::options::AggregateOptions;

/// Merge an ordered list of options into the single value the driver takes.
///
/// Returns `None` for an empty list. Fields left unset in a later entry keep
/// the value from earlier entries.
pub fn merge_options(options: &[AggregateOptions]) -> Option<AggregateOptions> {
    match options {
        [] => None,
        [single] => Some(single.clone()),
        _ => {
            let mut merged = AggregateOptions::default();
            for opts in options {
                merge_into(&mut merged, opts);
            }
            Some(merged)
        }
    }
}

fn merge_into(target: &mut AggregateOptions, source: &AggregateOptions) {
    if source.allow_disk_use.is_some() {
        target.allow_disk_use = source.allow_disk_use;
    }
    if source.batch_size.is_some() {
        target.batch_size = source.batch_size;
    }
    if source.bypass_document_validation.is_some() {
        target.bypass_document_validation = source.bypass_document_validation;
    }
    if source.collation.is_some() {
        target.collation = source.collation.clone();
    }
    if source.comment.is_some() {
        target.comment = source.comment.clone();
    }
    if source.hint.is_some() {
        target.hint = source.hint.clone();
    }
    if source.max_await_time.is_some() {
        target.max_await_time = source.max_await_time;
    }
    if source.max_time.is_some() {
        target.max_time = source.max_time;
    }
    if source.read_concern.is_some() {
        target.read_concern = source.read_concern.clone();
    }
    if source.selection_criteria.is_some() {
        target.selection_criteria = source.selection_criteria.clone();
    }
    if source.write_concern.is_some() {
        target.write_concern = source.write_concern.clone();
    }
    if source.let_vars.is_some() {
        target.let_vars = source.let_vars.clone();
    }
}
