pub mod animation;
pub mod camera;
pub mod config;
pub mod cube;
pub mod fragments;
pub mod geometry;
pub mod lifecycle;
pub mod lighting;
pub mod material;
pub mod page;
pub mod rendering;
pub mod scene_builder;
pub mod scene_graph;
pub mod scroll;

#[cfg(target_arch = "wasm32")]
mod web;
