#[cfg(not(target_arch = "wasm32"))]
mod window;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    window::run(skills_cube::config::CubeConfig::default())
}

// The browser build starts from the library's wasm entry point instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
