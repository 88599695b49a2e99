use std::collections::BTreeMap;

pub type ComunaMap = BTreeMap<String, String>;

fn main() {
    println!("cargo:rerun-if-changed=src/comunas.json");
    let s = include_str!("./src/comunas.json");
    let s = serde_json::from_str::<ComunaMap>(&s).unwrap();
    for (comuna, distrito) in s.iter() {
        let canonical = distrito.len() == 3
            && distrito.starts_with('D')
            && distrito[1..].chars().all(|c| c.is_ascii_digit());
        assert!(canonical, "comuna {comuna}: distrito {distrito} is not a canonical code");
    }
    uneval::to_out_dir(&s, "comunas.rs").unwrap();
}
