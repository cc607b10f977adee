fn main() {
    let frame = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r"ICA3D17F2>APRS,qAS,dl4mea:/074849h4821.61N\01224.49E^322/103/A=003054".to_string());

    let result = aprs_decode::parse(frame.as_bytes());

    println!("{:#?}", result);
}
