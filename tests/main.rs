use xparam::{
    derive::*, show_default_params, CommandLine, Param, ParamType, TypeTag, UsageConfig, XOption,
    XOptions,
};

#[test]
fn builder_parse() {
    let mut verbose: u32 = 0;
    let mut capacity: u64 = 0;
    let mut mode: u32 = 0o600;
    let mut label = String::default();
    let parser = CommandLine::new("mpool_create")
        .option(
            XOption::new('v')
                .long("verbose")
                .counter(&mut verbose),
        )
        .option(
            XOption::new('c')
                .long("capacity")
                .argument(ParamType::of(TypeTag::U64Size), &mut capacity),
        )
        .param(Param::mode(&mut mode, "mode"))
        .param(Param::string(&mut label, 32, "label").required())
        .build_parser()
        .unwrap();

    let next_arg = parser
        .parse_tokens(&["-vv", "--capacity=4G", "mode=0755", "label=mp1", "/dev/sda"])
        .unwrap();

    assert_eq!(next_arg, 4);
    assert_eq!(verbose, 2);
    assert_eq!(capacity, 4 << 30);
    assert_eq!(mode, 0o755);
    assert_eq!(label, "mp1");
}

#[test]
fn builder_config_error() {
    let mut a: u32 = 0;
    let mut b: u32 = 0;

    let error = CommandLine::new("program")
        .option(XOption::new('a').counter(&mut a))
        .option(XOption::new('a').counter(&mut b))
        .build_parser()
        .err()
        .unwrap();

    assert!(error.to_string().starts_with("Config error: "));
}

#[test]
fn standalone_getopt() {
    let mut force: u32 = 0;
    let mut options = XOptions::new(vec![XOption::new('f').long("force").counter(&mut force)]).unwrap();
    let args = ["--force", "-f", "--", "-f"];

    let mut getopt = options.xgetopt(&args, "f").unwrap();
    assert_eq!(getopt.next(), Some(Ok('f')));
    assert_eq!(getopt.next(), Some(Ok('f')));
    assert_eq!(getopt.next(), None);
    assert_eq!(getopt.remaining(), &["-f"]);
    drop(getopt);
    drop(options);

    assert_eq!(force, 2);
}

#[derive(Debug, Default, ParamTable)]
struct Pool {
    #[xparam(kind = u64_size, help = "Capacity of the pool.")]
    capacity: u64,
    #[xparam(name = "label", capacity = 8, required)]
    pool_label: String,
    #[xparam(kind = pct, hidden)]
    spare: u8,
    #[xparam(range = 1..5)]
    stripes: u32,
    #[xparam(repeat)]
    verbose: bool,
    #[xparam(skip)]
    devices: Vec<String>,
}

#[test]
fn derive_parse() {
    let mut pool = Pool {
        stripes: 1,
        ..Pool::default()
    };
    let mut table = pool.param_table().unwrap();

    let next_arg = table
        .process_params(&[
            "capacity=10M",
            "label=mp1",
            "spare=10",
            "stripes=4",
            "verbose=yes",
            "verbose=no",
            "/dev/sda",
        ])
        .unwrap();
    table.verify_params().unwrap();
    drop(table);

    assert_eq!(next_arg, 6);
    assert_eq!(pool.capacity, 10 << 20);
    assert_eq!(pool.pool_label, "mp1");
    assert_eq!(pool.spare, 10);
    assert_eq!(pool.stripes, 4);
    assert!(!pool.verbose);
    assert!(pool.devices.is_empty());
}

#[test]
fn derive_errors() {
    let mut pool = Pool::default();
    let mut table = pool.param_table().unwrap();
    assert!(table.process_params(&["stripes=5"]).is_err());
    assert!(table.process_params(&["label=too-long-label"]).is_err());
    // `label` is required.
    assert!(table.verify_params().is_err());
}

#[test]
fn derive_usage() {
    let mut pool = Pool::default();
    let table = pool.param_table().unwrap();
    let mut out: Vec<u8> = Vec::new();

    show_default_params(&table, &UsageConfig::default(), &mut out).unwrap();

    let usage = String::from_utf8(out).unwrap();
    assert!(usage.contains("capacity=<u64_size>"));
    assert!(usage.contains("Capacity of the pool."));
    assert!(!usage.contains("spare"));
}

#[test]
fn derive_command_line() {
    let mut pool = Pool {
        stripes: 1,
        ..Pool::default()
    };
    let mut verbose: u32 = 0;
    let table = pool.param_table().unwrap();

    let parser = CommandLine::new("derived")
        .option(XOption::new('v').counter(&mut verbose))
        .table(table)
        .build_parser()
        .unwrap();
    let next_arg = parser.parse_tokens(&["-v", "label=mp2", "/dev/sdb"]).unwrap();

    assert_eq!(next_arg, 2);
    assert_eq!(verbose, 1);
    assert_eq!(pool.pool_label, "mp2");
}
