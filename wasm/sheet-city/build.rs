use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=palette.json");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("palette_gen.rs");

    let json_str = fs::read_to_string("palette.json").expect("Failed to read palette.json");

    let json: serde_json::Value =
        serde_json::from_str(&json_str).expect("Failed to parse palette.json");

    let mut output = String::from("// Auto-generated palette from palette.json\n\n");

    for (name, value) in json.as_object().unwrap() {
        let upper_name = name.to_uppercase();
        match value {
            serde_json::Value::Array(entries) => {
                output.push_str(&format!(
                    "pub const {}: [(u8, u8, u8); {}] = [\n",
                    upper_name,
                    entries.len()
                ));
                for hex in entries {
                    let (r, g, b) = parse_hex(hex.as_str().unwrap());
                    output.push_str(&format!("    ({}, {}, {}),\n", r, g, b));
                }
                output.push_str("];\n\n");
            }
            serde_json::Value::String(hex) => {
                let (r, g, b) = parse_hex(hex);
                output.push_str(&format!(
                    "pub const {}: (u8, u8, u8) = ({}, {}, {});\n\n",
                    upper_name, r, g, b
                ));
            }
            other => panic!("unsupported palette entry {}: {}", name, other),
        }
    }

    fs::write(&dest_path, output).expect("Failed to write palette_gen.rs");
}

fn parse_hex(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap();
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap();
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap();
    (r, g, b)
}
