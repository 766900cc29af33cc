use log::debug;

use warp_loop::frame;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let threads = num_cpus::get();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    debug!("using {} render threads", threads);

    frame::run(&frame::Config::default())
}
