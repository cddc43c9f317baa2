use std::{error::Error, io, path::PathBuf};

use argbind::{
    actions, ArgumentEnum, ArgumentQueue, BindError, Bindable, Catalog, CoercionError,
    ConfigurationError, FlagSet, FromToken,
};

#[derive(Clone, Copy, Debug, PartialEq, ArgumentEnum)]
enum Permission {
    Read = 1,
    Write = 2,
    Exec = 4,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, ArgumentEnum)]
enum Compression {
    #[default]
    None,
    Zlib,
    #[argument(name = "lz")]
    Lzma,
}

#[derive(Debug, Default, Bindable)]
struct Network {
    #[argument(name = "port", alias = "p")]
    port: u16,
}

#[derive(Debug, Default, Bindable)]
#[bind(actions)]
struct Settings {
    #[argument(name = "limit", alias = "l")]
    limit: i32,

    #[argument(name = "verbose", alias = "v")]
    verbose: bool,

    #[argument(name = "other")]
    other: bool,

    #[argument(name = "mode")]
    mode: FlagSet<Permission>,

    #[argument(name = "compression", alias = "c")]
    compression: Compression,

    #[argument(name = "revision")]
    revision: Option<i32>,

    #[argument(name = "title")]
    title: String,

    #[argument(name = "ratio")]
    ratio: f64,

    #[argument(name = "input", orphan_index = 0)]
    input: Option<PathBuf>,

    #[argument(flatten)]
    network: Network,

    untouched: u8,
    log: Vec<String>,
}

#[actions]
impl Settings {
    #[argument(name = "replace", alias = "r")]
    fn replace(&mut self, pattern: String, #[default(1)] count: i32) {
        self.log.push(format!("replace {pattern} x{count}"));
    }

    #[argument(name = "check")]
    fn check(&self) -> io::Result<()> {
        Err(io::Error::other("check failed"))
    }

    #[allow(dead_code)]
    fn helper(&self) -> usize {
        self.log.len()
    }
}

fn bind(tokens: &[&str]) -> (Settings, ArgumentQueue, Result<argbind::Binding<Settings>, BindError>) {
    let mut settings = Settings::default();
    let mut queue: ArgumentQueue = tokens.iter().copied().collect();
    let result = argbind::bind(&mut settings, &mut queue);
    (settings, queue, result)
}

#[test]
fn catalog_has_one_entry_per_name_and_alias() {
    let catalog = Catalog::<Settings>::of().unwrap();

    // 11 names (including the flattened port and both actions) and 5 aliases
    assert_eq!(catalog.options().count(), 16);
    assert_eq!(catalog.positionals().count(), 1);
    assert!(catalog.lookup("--untouched").is_none());
    assert!(catalog.lookup("--input").is_none());
}

#[test]
fn limit_end_to_end() {
    let (settings, queue, result) = bind(&["--limit", "10", "extra"]);
    let binding = result.unwrap();

    assert_eq!(settings.limit, 10);
    assert_eq!(queue.into_remaining(), ["extra"]);
    assert!(binding.invocations().is_empty());
}

#[test]
fn booleans_toggle_without_consuming() {
    let (settings, queue, result) = bind(&["--verbose", "--other"]);
    result.unwrap();

    assert!(settings.verbose);
    assert!(settings.other);
    assert!(queue.is_empty());

    let (settings, queue, result) = bind(&["-v", "-v", "file.txt"]);
    result.unwrap();

    assert!(!settings.verbose);
    assert_eq!(queue.into_remaining(), ["file.txt"]);
}

#[test]
fn flag_sets_combine() {
    let (settings, _, result) = bind(&["--mode", "Read,Exec"]);
    result.unwrap();

    assert_eq!(settings.mode.bits(), 5);
    assert!(settings.mode.contains(Permission::Exec));
    assert!(!settings.mode.contains(Permission::Write));
}

#[test]
fn enums_match_names_ignoring_case() {
    let (settings, _, result) = bind(&["-c", "ZLIB"]);
    result.unwrap();
    assert_eq!(settings.compression, Compression::Zlib);

    let (settings, _, result) = bind(&["--compression", "LZ"]);
    result.unwrap();
    assert_eq!(settings.compression, Compression::Lzma);

    let (_, _, result) = bind(&["--compression", "lzma"]);
    assert!(matches!(
        result,
        Err(BindError::Coercion(CoercionError::UnknownVariant {
            expected: "Compression",
            ..
        }))
    ));
}

#[test]
fn starved_enums_keep_their_value() {
    let (settings, queue, result) = bind(&["--compression"]);
    result.unwrap();

    assert_eq!(settings.compression, Compression::None);
    assert!(queue.is_empty());
}

#[test]
fn nullable_integers() {
    let (settings, _, result) = bind(&["--revision", "42"]);
    result.unwrap();
    assert_eq!(settings.revision, Some(42));

    let (settings, _, result) = bind(&["--revision"]);
    result.unwrap();
    assert_eq!(settings.revision, None);

    let mut settings = Settings {
        revision: Some(7),
        ..Settings::default()
    };
    let mut queue = ArgumentQueue::from(["--revision", "--verbose"]);
    argbind::bind(&mut settings, &mut queue).unwrap();
    assert_eq!(settings.revision, Some(7));
    assert!(settings.verbose);
}

#[test]
fn strings_do_not_swallow_options() {
    let (settings, _, result) = bind(&["--title", "--verbose"]);
    result.unwrap();

    assert_eq!(settings.title, "");
    assert!(settings.verbose);
}

#[test]
fn unsupported_types_pass_through() {
    let (settings, queue, result) = bind(&["--ratio", "0.5"]);
    result.unwrap();

    assert_eq!(settings.ratio, 0.0);
    assert_eq!(queue.into_remaining(), ["0.5"]);
}

#[test]
fn unknown_options_bind_nothing() {
    let (settings, queue, result) = bind(&["--nope"]);

    assert!(matches!(result, Err(BindError::UnknownOption(option)) if option == "--nope"));
    assert_eq!(settings.limit, 0);
    assert!(queue.is_empty());
}

#[test]
fn invalid_integers_abort() {
    let (_, _, result) = bind(&["--limit", "many"]);

    let error = result.unwrap_err();
    assert_eq!(error.to_string(), "\"many\" is not a valid i32");
    assert!(error.source().is_some());
}

#[test]
fn flattened_members_are_reachable() {
    let (settings, _, result) = bind(&["-p", "8080"]);
    result.unwrap();

    assert_eq!(settings.network.port, 8080);
}

#[test]
fn positionals_are_resolved_before_options() {
    let (settings, queue, result) = bind(&["game.swf", "-l", "3", "rest"]);
    let binding = result.unwrap();

    assert_eq!(settings.input, Some(PathBuf::from("game.swf")));
    assert_eq!(settings.limit, 3);
    assert!(binding.unresolved().is_empty());
    assert_eq!(queue.into_remaining(), ["rest"]);
}

#[test]
fn unresolved_positionals_are_reported() {
    let (settings, _, result) = bind(&["--verbose"]);
    let binding = result.unwrap();

    assert_eq!(settings.input, None);
    assert_eq!(binding.unresolved(), ["input"]);
    assert!(matches!(
        binding.require_positionals(),
        Err(BindError::MissingPositional("input"))
    ));
}

#[test]
fn actions_are_deferred_until_invoked() {
    let (mut settings, queue, result) = bind(&["-r", "foo", "--replace", "bar", "3", "--verbose"]);
    let binding = result.unwrap();

    assert!(settings.log.is_empty());
    assert!(settings.verbose);
    assert!(queue.is_empty());

    let invocations = binding.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].name(), "replace");
    assert_eq!(invocations[0].arguments().get::<i32>(1), Some(&1));
    assert_eq!(invocations[1].arguments().get::<i32>(1), Some(&3));

    binding.invoke_all(&mut settings).unwrap();
    assert_eq!(settings.log, ["replace foo x1", "replace bar x3"]);
}

#[test]
fn failing_actions_stop_the_run() {
    let (mut settings, _, result) = bind(&["--check", "--replace", "x"]);
    let binding = result.unwrap();

    let error = binding.invoke_all(&mut settings).unwrap_err();
    assert_eq!(error.to_string(), "check failed");
    assert!(settings.log.is_empty());
}

#[test]
fn populate_discards_actions() {
    let mut settings = Settings::default();
    let mut queue = ArgumentQueue::from(["--replace", "x", "--limit", "2"]);

    argbind::populate(&mut settings, &mut queue).unwrap();

    assert_eq!(settings.limit, 2);
    assert!(settings.log.is_empty());
}

#[derive(Debug, Default, Bindable)]
#[bind(actions)]
struct Switches {
    calls: u32,
}

#[actions]
impl Switches {
    #[argument(name = "enable")]
    fn enable(&mut self, _level: i32, _on: bool) {
        self.calls += 1;
    }
}

#[test]
fn boolean_parameters_are_a_configuration_error() {
    let queues: [&[&str]; 3] = [&["--enable"], &["--enable", "1", "true"], &["--enable", "x"]];
    for tokens in queues {
        let mut switches = Switches::default();
        let mut queue: ArgumentQueue = tokens.iter().copied().collect();

        assert!(matches!(
            argbind::bind(&mut switches, &mut queue),
            Err(BindError::Configuration(ConfigurationError::BooleanParameter {
                method: "enable",
                parameter: "_on",
            }))
        ));
    }
}

#[derive(Default, Bindable)]
struct Duplicated {
    #[argument(name = "limit", alias = "l")]
    limit: i32,

    #[argument(name = "level", alias = "l")]
    level: i32,
}

#[test]
fn duplicate_aliases_are_a_configuration_error() {
    assert!(matches!(
        Catalog::<Duplicated>::of(),
        Err(ConfigurationError::DuplicateOption(option)) if option == "-l"
    ));

    let mut target = Duplicated::default();
    let mut queue = ArgumentQueue::from(["--limit", "1"]);
    assert!(matches!(
        argbind::bind(&mut target, &mut queue),
        Err(BindError::Configuration(_))
    ));
    assert_eq!(queue.len(), 2);
}

#[derive(Default, Bindable)]
#[bind(actions)]
struct PositionalAction {
    #[argument(name = "first", orphan_index = 0)]
    first: String,
}

#[actions]
impl PositionalAction {
    #[argument(name = "dump", orphan_index = 1)]
    fn dump(&mut self) {}
}

#[test]
fn positional_actions_are_a_configuration_error() {
    assert!(matches!(
        Catalog::<PositionalAction>::of(),
        Err(ConfigurationError::PositionalMethod("dump"))
    ));
}

/// A game client, identified by the revision in its file name
#[derive(Debug, PartialEq)]
struct Game {
    revision: String,
}

impl FromToken for Game {
    fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
        match token.strip_suffix(".swf") {
            Some(revision) => Ok(Self {
                revision: revision.to_string(),
            }),
            None => Err(format!("{token} is not a client file").into()),
        }
    }
}

#[derive(Debug, Default, Bindable)]
struct Modify {
    #[argument(name = "game", orphan_index = 0)]
    game: Option<Game>,

    #[argument(name = "output", orphan_index = 3)]
    output: Option<String>,
}

#[test]
fn positional_types_build_themselves() {
    let mut modify = Modify::default();
    let mut queue = ArgumentQueue::from(["PRODUCTION-2024.swf", "out"]);

    let binding = argbind::bind(&mut modify, &mut queue).unwrap();

    assert_eq!(
        modify.game,
        Some(Game {
            revision: "PRODUCTION-2024".to_string()
        })
    );
    assert_eq!(modify.output.as_deref(), Some("out"));
    assert!(binding.unresolved().is_empty());
}

#[test]
fn failed_construction_aborts() {
    let mut modify = Modify::default();
    let mut queue = ArgumentQueue::from(["notes.txt"]);

    let error = argbind::bind(&mut modify, &mut queue).unwrap_err();

    assert!(matches!(
        error,
        BindError::Coercion(CoercionError::Construction { member: "game", .. })
    ));
    assert_eq!(
        error.to_string(),
        "\"notes.txt\" cannot be used for game: notes.txt is not a client file"
    );
}
