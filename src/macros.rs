/// Build one entry of the selector option table.
///
/// Keeps the registry in `engine/options.rs` declarative: each entry names
/// its handler function, an applicability predicate over the current parse
/// state, and the translation key of its description.
#[macro_export]
macro_rules! option {
    (
        id: $id:expr,
        handler: $handler:expr,
        applicable: $applicable:expr,
        description: $description:expr
        $(,)?
    ) => {
        $crate::engine::options::SelectorOption {
            id: $id,
            handler: $handler,
            applicable: $applicable,
            description: $description,
        }
    };
}
