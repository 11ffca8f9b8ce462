use serde_json::{Map, Value};
use tracing::trace;

use crate::config::ExtractorConfig;
use crate::summarizer::Summarizer;
use crate::value::get_path;

/// Assembles a summary object from `source` following the key-selection
/// policy of `config`.
///
/// Explicit `keys` are resolved first, in list order, and always win over
/// `exclude`. With `include_all`, the remaining top-level keys follow in
/// source order unless excluded. Every copied value is run through the
/// bounded summarizer.
pub fn build_object(source: &Map<String, Value>, config: &ExtractorConfig) -> Map<String, Value> {
    let summarizer = Summarizer::new(config.caps);
    let mut out = Map::new();

    for path in config.keys.iter().flatten() {
        match resolve(source, path) {
            Some(value) => {
                out.insert(path.clone(), summarizer.summarize(value));
            }
            None => trace!(path = %path, "requested key not present"),
        }
    }

    if config.include_all {
        for (key, value) in source {
            if out.contains_key(key) || config.is_excluded(key) {
                continue;
            }
            out.insert(key.clone(), summarizer.summarize(value));
        }
    }

    out
}

fn resolve<'a>(source: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = source.get(path).filter(|value| !value.is_null()) {
        return Some(value);
    }

    let (head, rest) = path.split_once('.')?;
    source
        .get(head)
        .and_then(|nested| get_path(nested, rest))
}
