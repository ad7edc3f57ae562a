use xparam::derive::*;
use xparam::CommandLine;

#[derive(Debug, Default, ParamTable)]
struct PoolParams {
    #[xparam(kind = u64_size, help = "Capacity of the pool.")]
    capacity: u64,
    #[xparam(kind = mode, help = "Pool access mode.")]
    mode: u32,
    #[xparam(name = "label", capacity = 32, required, help = "Pool label.")]
    pool_label: String,
    #[xparam(kind = pct, hidden)]
    spare: u8,
    #[xparam(skip)]
    devices: Vec<String>,
}

fn main() {
    let mut params = PoolParams {
        mode: 0o600,
        spare: 5,
        ..PoolParams::default()
    };
    let table = match params.param_table() {
        Ok(table) => table,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };
    let next_arg = CommandLine::new("derived")
        .about("Create a media pool, with parameters derived from a struct.")
        .table(table)
        .build()
        .parse();

    params.devices = std::env::args().skip(1 + next_arg).collect();
    println!("{params:?}");
}
