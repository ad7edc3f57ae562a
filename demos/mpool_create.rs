use xparam::{CommandLine, Param, ParamType, TypeTag, XOption};

fn main() {
    let mut verbose: u32 = 0;
    let mut force: u32 = 0;
    let mut dry_run: u32 = 0;
    let mut capacity: u64 = 0;
    let mut mode: u32 = 0o600;
    let mut uid: u32 = 0;
    let mut spare_pct: u8 = 5;
    let mut label = String::default();

    let parser = CommandLine::new("mpool_create")
        .about("Create a media pool.")
        .option(
            XOption::new('v')
                .long("verbose")
                .help("Increase verbosity.")
                .counter(&mut verbose),
        )
        .option(
            XOption::new('f')
                .long("force")
                .excludes("n")
                .help("Create the pool even if the devices are in use.")
                .counter(&mut force),
        )
        .option(
            XOption::new('n')
                .long("dry-run")
                .help("Validate the request without creating the pool.")
                .counter(&mut dry_run),
        )
        .option(
            XOption::new('c')
                .long("capacity")
                .help("Capacity of the pool.")
                .argument(ParamType::of(TypeTag::U64Size), &mut capacity),
        )
        .reveal_flag('T')
        .param(Param::mode(&mut mode, "mode").help("Pool access mode."))
        .param(Param::uid(&mut uid, "uid").help("Pool owner."))
        .param(Param::pct(&mut spare_pct, "spare").help("Spare capacity percentage.").hidden())
        .param(Param::xstring(&mut label, 32, "label").help("Pool label.").required())
        .build();

    let next_arg = parser.parse();
    let remaining: Vec<String> = std::env::args().skip(1 + next_arg).collect();

    println!(
        "label={label} capacity={} mode={mode:04o} uid={uid} spare={spare_pct}% verbose={verbose} force={force} dry-run={dry_run}",
        xparam::space_to_string(capacity),
    );
    println!("devices: {remaining:?}");
}
