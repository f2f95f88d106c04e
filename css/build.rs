use std::{env, fs, path::Path};

use tailwind_design_tokens_core::{Config, TokenPipeline};

fn main() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let pipeline = TokenPipeline::new(Config::default().with_base_dir(&root));
    let dictionary = pipeline.load().unwrap();
    let rendered = pipeline.render_platform("tailwindcss", &dictionary).unwrap();

    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("app.css");
    fs::write(&dest_path, &rendered[0].contents).unwrap();
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../tokens/tokens.json");
}
