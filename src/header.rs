use crate::config::{Config, OPT_HIDE_EMPTY_LINES, OPT_REPLACE_DEFAULT_METADATA, OPT_SHOW_ICONS};
use crate::models::{Header, HeaderLine};
use crate::template::TemplateEngine;
use std::collections::HashMap;
use tracing::debug;

/// Render every filter slot into a header line, in slot order.
///
/// - `hide_empty_lines`: drop lines whose text renders to nothing.
/// - `show_icons`: when off, lines carry no icon.
pub fn header_lines(
    cfg: &Config,
    engine: &TemplateEngine,
    values: &HashMap<String, String>,
) -> Vec<HeaderLine> {
    let hide_empty = cfg.option(OPT_HIDE_EMPTY_LINES);
    let show_icons = cfg.option(OPT_SHOW_ICONS);

    let mut lines = Vec::new();
    for (slot, (filter, icon)) in cfg.filters.iter().zip(cfg.icons.iter()).enumerate() {
        let text = engine.render(filter, values).trim().to_string();
        if hide_empty && text.is_empty() {
            debug!("filter {} rendered empty, skipping", slot);
            continue;
        }
        lines.push(HeaderLine {
            icon: show_icons.then(|| icon.clone()),
            text,
        });
    }
    lines
}

/// Header lines plus the `replace_default_metadata` switch for the renderer.
pub fn build_header(
    cfg: &Config,
    engine: &TemplateEngine,
    values: &HashMap<String, String>,
) -> Header {
    Header {
        lines: header_lines(cfg, engine, values),
        replace_default_metadata: cfg.option(OPT_REPLACE_DEFAULT_METADATA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_follow_their_slot() {
        let cfg = Config::default();
        let values: HashMap<String, String> = [
            ("release_date", "2000"),
            ("tracks", "9 tracks"),
            ("discs", ""),
            ("disc_ratio", ""),
            ("length", "40 min 1 sec"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let lines = header_lines(&cfg, &TemplateEngine::default(), &values);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], HeaderLine { icon: Some("album".into()), text: "9 tracks".into() });
        assert_eq!(lines[2].icon.as_deref(), Some("clock"));
    }
}
