use std::error::Error;

/// Write an error, followed by every `source` in its chain, one per line.
/// Used as the `Debug` impl of our error types, so that `{:?}` in logs shows
/// the root cause and not just the outermost message.
pub fn error_chain_fmt(
    e: &impl Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
