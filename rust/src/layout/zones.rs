//! Zone ordering and zone metadata.

use std::collections::BTreeSet;

use crate::config::LayoutConfig;
use crate::models::ZoneMeta;

/// Display order of zones.
///
/// Zones named in `zone_order` come first, in that order, and are kept even
/// when no task uses them. Remaining zones follow alphabetically.
pub fn display_order<'a>(present: impl IntoIterator<Item = &'a str>, zone_order: Option<&[String]>) -> Vec<String> {
    let mut remaining: BTreeSet<&str> = present.into_iter().collect();
    let mut ordered: Vec<String> = Vec::new();

    for zone in zone_order.unwrap_or_default() {
        if ordered.iter().any(|z| z == zone) {
            continue;
        }
        remaining.remove(zone.as_str());
        ordered.push(zone.clone());
    }
    ordered.extend(remaining.into_iter().map(str::to_string));
    ordered
}

/// Accumulates zone rows in display order.
#[derive(Debug, Default)]
pub struct ZoneStack {
    zones: Vec<ZoneMeta>,
    next_row: usize,
}

impl ZoneStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// First row of the next zone to be pushed.
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// Append a zone using `lane_count` lanes; it occupies at least one row.
    pub fn push(&mut self, name: &str, lane_count: usize, config: &LayoutConfig) -> &ZoneMeta {
        let meta = ZoneMeta {
            name: name.to_string(),
            start_row: self.next_row,
            row_count: lane_count.max(1),
            color: config.zone_color(self.zones.len()),
        };
        self.next_row += meta.row_count;
        self.zones.push(meta);
        &self.zones[self.zones.len() - 1]
    }

    pub fn into_zones(self) -> Vec<ZoneMeta> {
        self.zones
    }
}
