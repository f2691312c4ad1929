use std::process::ExitCode;

use glint::gpu::{ComputeJob, GpuContext, WgpuCompute};

const N: usize = 1024;

fn run() -> glint::Result<Vec<f32>> {
    let ctx = GpuContext::headless()?;
    log::info!("Running on {}", ctx.adapter_summary());

    let lhs = vec![1.0f32; N];
    let rhs = vec![2.0f32; N];
    ComputeJob::vector_add(&lhs, &rhs).run(&mut WgpuCompute::new(&ctx))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(out) => {
            for (i, value) in out.iter().take(10).enumerate() {
                println!("out[{i}] = {value}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
