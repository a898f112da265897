//! Contains the main `run()` function of the query tool.

use std::{fmt::Display, path::PathBuf, process::ExitCode};

use eolian_database::{
    Class, Config, Database, DeclarationType, FunctionType, Query, Session,
};
use log::info;

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "eolian-query",
    about = "Scans Eolian interface files and prints what they declare",
    author = "Simmypeet"
)]
pub struct Arguments {
    /// The directories to scan for interface and types files.
    pub directories: Vec<PathBuf>,

    /// The TOML configuration file. The defaults are used if not specified.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Also scans the system directories of the configuration.
    #[clap(short, long)]
    pub system: bool,

    /// Prints the class with the given dotted name.
    #[clap(long)]
    pub class: Option<String>,

    /// Prints every declaration of the database.
    #[clap(short, long)]
    pub list: bool,
}

/// Renders a class with its ancestors, functions and events.
#[derive(Debug, Clone, Copy)]
pub struct ClassReport<'db>(pub Class<'db>);

impl Display for ClassReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = self.0;

        writeln!(
            f,
            "class {} ({:?}) in {}",
            class.full_name(),
            class.class_type(),
            class.file()
        )?;
        writeln!(f, "  c name: {}", class.c_name())?;

        let inherits = class
            .inherits_full()
            .map(|base| base.full_name())
            .collect::<Vec<_>>();
        if !inherits.is_empty() {
            writeln!(f, "  inherits: {}", inherits.join(", "))?;
        }

        for function in class.functions(FunctionType::Unresolved) {
            let kind = match function.function_type() {
                FunctionType::Method => "method",
                FunctionType::Property => "property",
                FunctionType::PropGet => "getter",
                FunctionType::PropSet => "setter",
                FunctionType::Unresolved | FunctionType::FunctionPointer => {
                    "function"
                }
            };

            writeln!(
                f,
                "  {kind} {}: {}",
                function.name(),
                function.full_c_name(FunctionType::Unresolved, false)
            )?;
        }

        for event in class.events() {
            match event.event_type() {
                Some(ty) => writeln!(f, "  event {}: {ty}", event.name())?,
                None => writeln!(f, "  event {}", event.name())?,
            }
        }

        Ok(())
    }
}

/// Renders every declaration of a database, one per line, in declaration
/// order.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationList<'db>(pub &'db Database);

impl Display for DeclarationList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for declaration in self.0.all_declarations() {
            let kind = match declaration.declaration_type() {
                DeclarationType::Class => "class",
                DeclarationType::Alias => "alias",
                DeclarationType::Struct => "struct",
                DeclarationType::Enum => "enum",
                DeclarationType::Var => "variable",
                DeclarationType::Unknown => "unknown",
            };

            writeln!(
                f,
                "{kind} {} ({})",
                declaration.name(),
                declaration.file()
            )?;
        }

        Ok(())
    }
}

fn load_config(arguments: &Arguments) -> Option<Config> {
    let config = match &arguments.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("{error}");
                return None;
            }
        },
        None => Config::default(),
    };

    Some(config.with_environment())
}

/// Scans and parses everything the arguments name. Returns whether every
/// step succeeded; failures have been logged.
fn populate(database: &mut Database, arguments: &Arguments) -> bool {
    let mut succeeded = true;

    if arguments.system {
        succeeded &= database.system_directory_scan();
    }

    for directory in &arguments.directories {
        succeeded &= database.directory_scan(directory);
    }

    succeeded &= database.all_eot_files_parse();
    succeeded &= database.all_eo_files_parse();

    info!(
        "loaded {} classes and {} declarations",
        database.all_classes().count(),
        database.all_declarations().count()
    );

    succeeded
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(arguments: Arguments) -> ExitCode {
    let Some(config) = load_config(&arguments) else {
        return ExitCode::FAILURE;
    };

    let session = Session::new(config);
    let mut database = session.database();

    let succeeded = populate(&mut database, &arguments);

    if let Some(name) = &arguments.class {
        match database.class_by_name(name) {
            Some(class) => print!("{}", ClassReport(class)),
            None => {
                eprintln!("no class is named `{name}`");
                return ExitCode::FAILURE;
            }
        }
    }

    if arguments.list {
        print!("{}", DeclarationList(&database));
    }

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use clap::Parser;
    use eolian_database::{Query, Session};

    use super::{Arguments, ClassReport, DeclarationList};

    #[test]
    fn parses_arguments() {
        let arguments = Arguments::try_parse_from([
            "eolian-query",
            "--class",
            "Efl.Loop",
            "-l",
            "first",
            "second",
        ])
        .unwrap();

        assert_eq!(arguments.class.as_deref(), Some("Efl.Loop"));
        assert!(arguments.list);
        assert!(!arguments.system);
        assert_eq!(arguments.config, None);
        assert_eq!(arguments.directories, [
            PathBuf::from("first"),
            PathBuf::from("second")
        ]);
    }

    #[test]
    fn reports_class_and_declarations() {
        let directory = tempfile::tempdir().unwrap();
        std::fs::write(
            directory.path().join("bar.eo"),
            r#"(class: (name: "Bar", type: Interface, methods: [(name: "ping")]))"#,
        )
        .unwrap();
        std::fs::write(
            directory.path().join("efl_loop.eo"),
            r#"(class: (
                name: "Efl.Loop",
                inherits: ["Bar"],
                properties: [(name: "time", get: ())],
                events: [(name: "idle")],
            ))"#,
        )
        .unwrap();

        let mut database = Session::default().database();
        assert!(database.directory_scan(directory.path()));
        assert!(database.all_eo_files_parse());

        let class = database.class_by_name("Efl.Loop").unwrap();
        let report = ClassReport(class).to_string();

        assert_eq!(
            report,
            "class Efl.Loop (Regular) in efl_loop.eo\n  c name: \
             EFL_LOOP_CLASS\n  inherits: Bar\n  getter time: \
             efl_loop_time_get\n  event idle\n"
        );
        assert_eq!(
            DeclarationList(&database).to_string(),
            "class Bar (bar.eo)\nclass Efl.Loop (efl_loop.eo)\n"
        );
    }
}
