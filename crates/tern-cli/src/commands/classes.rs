use serde::Serialize;
use tern_core::Colors;
use tern_runtime::{Builtins, PrototypeChainResolver};

pub struct ClassesArgs {
    pub json: bool,
    pub color: bool,
}

/// A built-in class and the tables a member lookup on it probes.
#[derive(Debug, Serialize)]
pub struct ClassRow {
    pub name: String,
    pub prototype: Option<String>,
    pub probes: Vec<String>,
}

pub fn run(args: ClassesArgs) {
    let builtins = tern_builtins::builtins();
    let rows = class_rows(&builtins);

    if args.json {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    print!("{}", render(&rows, Colors::new(args.color)));
}

pub fn class_rows(builtins: &Builtins) -> Vec<ClassRow> {
    let registry = builtins.registry();
    let image = builtins.image();
    let resolver = PrototypeChainResolver::new(image, registry);

    registry
        .classes()
        .map(|(_, class)| ClassRow {
            name: class.name().to_owned(),
            prototype: class
                .prototype()
                .map(|id| registry.class(id).name().to_owned()),
            probes: resolver
                .probe_order(class.name())
                .into_iter()
                .map(|(index, origin)| {
                    let table = image.table(index).map(|t| t.name()).unwrap_or_default();
                    format!("{}:{}", origin, table)
                })
                .collect(),
        })
        .collect()
}

pub fn render(rows: &[ClassRow], c: Colors) -> String {
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let pad = width - row.name.len();
        out.push_str(&format!(
            "{}{}{}{:pad$}  {}\n",
            c.name,
            row.name,
            c.reset,
            "",
            row.probes.join(" -> ")
        ));
    }
    out
}
