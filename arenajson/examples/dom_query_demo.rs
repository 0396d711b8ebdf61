// Example parsing a configuration document into a fixed token arena and
// reading values back with dotted paths

use arenajson::{Arena, ParseError, Token, TokenKind};

fn main() -> Result<(), ParseError> {
    let json = br#"{
        "device": "sensor-hub",
        "servers": [
            {"host": "10.0.0.1", "port": 8080, "tls": false},
            {"host": "10.0.0.2", "port": 8443, "tls": true}
        ],
        "thresholds": {"low": -5, "high": 42.5},
        "owner": null
    }"#;

    let mut slots = [Token::EMPTY; 32];
    let mut arena = Arena::from_slice(&mut slots)?;
    let doc = arena.parse(json)?;

    println!("Parsed {} bytes into {} tokens", json.len(), doc.token_count());
    println!();

    if let Some(device) = doc.find("device").and_then(|n| n.raw_str()) {
        println!("device: {}", device);
    }

    let servers = doc.find("servers");
    for (i, server) in servers.iter().flat_map(|s| s.children()).enumerate() {
        let host = server.find("host").and_then(|n| n.raw_str()).unwrap_or("?");
        let port = server.find("port").and_then(|n| n.as_int()).unwrap_or_default();
        let tls = server.find("tls").and_then(|n| n.as_bool()).unwrap_or(false);
        println!("server #{}: {}:{} tls={}", i, host, port, tls);
    }

    // '#' alone matches any array entry that can resolve the rest of the path
    if let Some(port) = doc.find("servers.#.port") {
        println!("first port found by wildcard: {:?}", port.number());
    }

    for path in ["thresholds.low", "thresholds.high"] {
        match doc.find(path).and_then(|n| n.number()) {
            Some(num) => println!("{}: {}", path, num),
            None => println!("{}: missing", path),
        }
    }

    if let Some(owner) = doc.find("owner") {
        println!("owner is {:?}", owner.kind());
        assert_eq!(owner.kind(), TokenKind::Null);
    }

    println!();
    println!("Paths that do not resolve return None:");
    for path in ["servers.#2", "thresholds.mid", "servers.#"] {
        println!("  {:<16} -> {:?}", path, doc.find(path).map(|n| n.index()));
    }

    arena.free();
    println!("Arena released, {} slots ready for reuse", arena.capacity());
    Ok(())
}
