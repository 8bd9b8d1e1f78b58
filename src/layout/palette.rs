//! Deterministic color assignment for logical schemas.
//!
//! Colors are assigned from a fixed palette in alphabetical order of
//! schema name, falling back to a hash-derived hue once the palette is
//! exhausted. The same schema name maps to the same color regardless of
//! the order schemas appear in the document.

use std::collections::HashMap;

use egui::ecolor::Hsva;
use egui::Color32;

use crate::model::Topology;

/// Fixed palette, assigned alphabetically before the hash fallback.
pub const SCHEMA_PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x4e, 0x79, 0xa7),
    Color32::from_rgb(0xf2, 0x8e, 0x2b),
    Color32::from_rgb(0x59, 0xa1, 0x4f),
    Color32::from_rgb(0xe1, 0x57, 0x59),
    Color32::from_rgb(0x76, 0xb7, 0xb2),
    Color32::from_rgb(0xed, 0xc9, 0x48),
    Color32::from_rgb(0xb0, 0x7a, 0xa1),
    Color32::from_rgb(0xff, 0x9d, 0xa7),
    Color32::from_rgb(0x9c, 0x75, 0x5f),
    Color32::from_rgb(0xba, 0xb0, 0xac),
];

/// Fill used for a source whose schema reference dangles.
pub const WARNING_FILL: Color32 = Color32::from_rgb(0x55, 0x50, 0x48);
/// Border used for the dangling-reference warning treatment.
pub const WARNING_BORDER: Color32 = Color32::from_rgb(0xe8, 0x4a, 0x3c);

/// FNV-1a, used for the palette-overflow hue and position jitter.
pub fn stable_hash(name: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in name.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100_0000_01b3);
    }
    hash
}

fn hash_color(name: &str) -> Color32 {
    let hue = (stable_hash(name) % 360) as f32 / 360.0;
    Color32::from(Hsva::new(hue, 0.55, 0.75, 1.0))
}

/// Compute the schema-name → color map for the current topology.
pub fn schema_colors(topology: &Topology) -> HashMap<String, Color32> {
    let mut names: Vec<&str> = topology.schemas().iter().map(|s| s.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let color = SCHEMA_PALETTE
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_color(name));
            (name.to_string(), color)
        })
        .collect()
}
