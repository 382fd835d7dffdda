mod seed;

use std::path::Path;

pub(crate) const SEED_JSON: &str = r#"{
    "vibes": [
        { "id": "focus", "name": "Focus", "mood": "calm", "energy": 0.3 }
    ],
    "worlds": [
        {
            "id": "office",
            "name": "Office",
            "owner_id": "owner",
            "occupancy": 4,
            "current_vibe_id": "focus",
            "sharing": { "is_public": true, "context_level": "partial" }
        },
        { "id": "lab", "name": "Lab", "owner_id": "owner", "kind": "virtual" }
    ]
}"#;

pub(crate) fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}
