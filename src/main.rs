use anyhow::Result;
use clap::Parser;

mod animation;
mod asset_pipeline;
mod camera;
mod config;
mod engine;
mod math;
mod media;
mod model;
mod page;
mod rendering;
mod scene_graph;
mod scroll;
mod sections;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = config::Config::parse();
    pollster::block_on(window::run(config))?;

    Ok(())
}
