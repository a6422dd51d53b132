// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> anyhow::Result<()> {
    bluehearts_lib::init_tracing();
    bluehearts_lib::run()
}
