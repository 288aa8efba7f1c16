#[cfg(not(target_arch = "wasm32"))]
core::compile_error!("This example can be built only for wasm32 target");

use {
    goods_inject::*,
    wasm_bindgen::prelude::*,
};

const MANIFEST: &str = r#"{
    "styles": ["https://cdn.jsdelivr.net/npm/vditor@3.5.5/dist/index.css"]
}"#;

const EDITOR: &str = "https://cdn.jsdelivr.net/npm/vditor@3.5.5/dist/index.min.js";

#[wasm_bindgen]
extern "C" {
    /// Page-provided function that mounts the editor.
    #[wasm_bindgen(js_name = vditorScript)]
    fn vditor_script();
}

#[wasm_bindgen]
pub async fn run() {
    // Init logging system.
    tracing_wasm::set_as_global_default();

    let document = WebDocument::current().expect_throw("No document");
    let loader = AssetLoader::new(document.clone(), WasmBindgen);

    // Stylesheet doesn't wait for content.
    let manifest = Manifest::from_json(MANIFEST).unwrap_throw();
    loader.apply(&manifest).unwrap_throw();

    // Element lookup makes sense only once content is parsed.
    document.content_ready().await.unwrap_throw();

    let loaded = loader
        .load_then_if(ElementId("vdit"), EDITOR, vditor_script)
        .unwrap_throw();

    if !loaded {
        tracing::info!("No editor on this page");
    }
}
