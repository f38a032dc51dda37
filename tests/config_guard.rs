use regex::Regex;
use std::fs;
use std::path::Path;

/// Fail CI if committed config files carry 64-hex private keys.
#[test]
fn no_committed_hex_keys_in_configs() {
    let re = Regex::new(r"0x?[a-fA-F0-9]{64}").unwrap();
    let candidates = [
        "config.toml",
        "config.prod.toml",
        "config.testnet.toml",
        "config.dev.toml",
        "config.example.toml",
        ".env.example",
    ];
    for file in candidates {
        if !Path::new(file).exists() {
            continue;
        }
        let body = fs::read_to_string(file).expect("read config");
        for (idx, line) in body.lines().enumerate() {
            if re.is_match(line) {
                panic!("Secret-looking hex in {} at line {}", file, idx + 1);
            }
        }
    }
}

/// Deployment records hold addresses only, never keys.
#[test]
fn deployment_records_hold_addresses_only() {
    let key_re = Regex::new(r"[a-fA-F0-9]{64}").unwrap();
    for file in ["deployed-address.txt", "deployed-addresses.json"] {
        if !Path::new(file).exists() {
            continue;
        }
        let body = fs::read_to_string(file).expect("read deployment record");
        assert!(
            !key_re.is_match(&body),
            "{} contains a 32-byte hex value",
            file
        );
    }
}
