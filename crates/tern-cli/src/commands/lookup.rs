use tern_core::{Colors, TableIndex};
use tern_runtime::{PrintTracer, PrototypeChainResolver, Resolution};
use tern_symbols::{CallKind, SymbolImage};

pub struct LookupArgs {
    pub class: String,
    pub member: String,
    pub trace: bool,
    pub max_depth: usize,
    pub color: bool,
}

pub fn run(args: LookupArgs) {
    let builtins = tern_builtins::builtins();
    let colors = Colors::new(args.color);

    if !builtins.registry().is_builtin_class_name(&args.class) {
        eprintln!("error: '{}' is not a built-in class", args.class);
        eprintln!();
        eprintln!("Run 'tern classes' for the full list.");
        std::process::exit(1);
    }

    let resolver = PrototypeChainResolver::new(builtins.image(), builtins.registry())
        .max_depth(args.max_depth);
    let result = if args.trace {
        let mut tracer = PrintTracer::new(builtins.image(), colors);
        let result = resolver.resolve_member_traced(&args.class, &args.member, &mut tracer);
        tracer.print();
        result
    } else {
        resolver.resolve_member(&args.class, &args.member)
    };

    match result {
        Some(resolution) => {
            println!("{}", render(builtins.image(), &args.member, &resolution, colors));
        }
        None => {
            eprintln!("error: '{}' has no member '{}'", args.class, args.member);
            std::process::exit(1);
        }
    }
}

/// One line: where the member was found, its signature and its target.
pub fn render(image: &SymbolImage, member: &str, resolution: &Resolution, c: Colors) -> String {
    let table_name = |index: TableIndex| {
        image
            .table(index)
            .map(|t| t.name())
            .unwrap_or_else(|| "?".to_owned())
    };
    let entry = &resolution.entry;
    let target = match entry.spec.call_kind() {
        CallKind::SymbolTable => match entry.table() {
            Some(index) => format!("{} {}", index, table_name(index)),
            None => "?".to_owned(),
        },
        CallKind::Function => entry.function().to_string(),
        CallKind::ExecuteImmediately => format!("{} immediate", entry.function()),
    };
    format!(
        "{}{}{}.{}  {}{}{}  {}  {}({}){}",
        c.name,
        table_name(resolution.table),
        c.reset,
        member,
        c.dim,
        entry.spec,
        c.reset,
        target,
        c.dim,
        resolution.origin,
        c.reset,
    )
}
