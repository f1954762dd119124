pub mod apply;
pub mod compositor;
pub mod desktop;
pub mod fs_ops;
pub mod xrandr;

#[cfg(test)]
mod pipeline_test;
