use serde_json::{Value, json};

use crate::model::GridLayout;
use crate::orchestrator::ModulePackReport;

/// Serialize a packed layout as `{ slots, meta }`.
/// `image` is the file name the engine should load for this layout.
pub fn to_json_layout(layout: &GridLayout, image: &str) -> Value {
    let slots: Vec<Value> = layout
        .slots
        .iter()
        .map(|s| {
            json!({
                "index": s.index,
                "key": s.key,
                "row": s.row,
                "col": s.col,
                "frame": {"x": s.frame.x, "y": s.frame.y, "w": s.frame.w, "h": s.frame.h},
                "rotated": s.rotated,
            })
        })
        .collect();
    json!({
        "slots": slots,
        "meta": {
            "app": "grid-packer",
            "version": env!("CARGO_PKG_VERSION"),
            "format": "RGBA8888",
            "image": image,
            "size": {"w": layout.width, "h": layout.height},
            "cell": {"w": layout.cell_width, "h": layout.cell_height},
            "slotsPerSide": layout.slots_per_side,
            "capacity": layout.capacity(),
        }
    })
}

/// Per-channel status of a module pack, keyed by channel name.
pub fn to_json_report(report: &ModulePackReport) -> Value {
    let mut channels = serde_json::Map::new();
    for o in &report.outcomes {
        let entry = match &o.result {
            Ok(summary) => json!({
                "ok": true,
                "output": o.output_path.to_string_lossy(),
                "tiles": summary.layout.slots.len(),
                "occupancy": summary.layout.occupancy(),
                "elapsedMs": o.elapsed().as_secs_f64() * 1000.0,
            }),
            Err(e) => json!({
                "ok": false,
                "output": o.output_path.to_string_lossy(),
                "error": e.to_string(),
                "elapsedMs": o.elapsed().as_secs_f64() * 1000.0,
            }),
        };
        channels.insert(o.channel.to_string(), entry);
    }
    json!({
        "channels": channels,
        "wallMs": report.wall_time.as_secs_f64() * 1000.0,
        "success": report.is_success(),
    })
}
