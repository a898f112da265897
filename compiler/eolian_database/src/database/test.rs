use std::path::Path;

use tempfile::TempDir;

use super::{Database, Error};
use crate::{
    declaration::DeclarationType,
    expression::{
        BinaryOperator, EvaluationError, ExpressionMask, ExpressionType,
        UnaryOperator, Value,
    },
    function::{FunctionType, ObjectScope},
    r#type::{BuiltinType, TypeType},
    session::Session,
    typedecl::TypedeclType,
    unit::Query,
};

fn write(directory: &Path, name: &str, text: &str) {
    let path = directory.join(name);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }

    std::fs::write(path, text).unwrap();
}

/// Writes the files into a fresh directory and scans it.
fn scanned(files: &[(&str, &str)]) -> (TempDir, Database) {
    let directory = tempfile::tempdir().unwrap();

    for (name, text) in files {
        write(directory.path(), name, text);
    }

    let mut database = Session::default().database();
    assert!(database.directory_scan(directory.path()));

    (directory, database)
}

const BAR: &str = r#"(class: (
    name: "Bar",
    type: Interface,
    methods: [(name: "ping")],
))"#;

const FOO: &str = r#"(class: (
    name: "Foo",
    inherits: ["Bar"],
    properties: [(
        name: "value",
        values: [(name: "v", type: (name: "int"))],
        get: (),
        set: (scope: Protected),
    )],
    implements: [(name: "Bar.ping")],
    constructors: [(name: "Bar.ping", optional: true)],
))"#;

#[test]
fn class_with_inherited_implement() {
    let (_directory, mut database) =
        scanned(&[("bar.eo", BAR), ("foo.eo", FOO)]);

    database.try_file_parse("foo.eo").unwrap();

    // the base class is loaded through the file named after it
    assert!(database.is_parsed("bar.eo"));

    let foo = database.class_by_name("Foo").unwrap();
    let bar = database.class_by_name("Bar").unwrap();

    assert_eq!(foo.file(), "foo.eo");
    assert_eq!(foo.base_class(), Some(bar));
    assert_eq!(
        foo.inherits_full().map(|class| class.full_name()).collect::<Vec<_>>(),
        ["Bar"]
    );

    let value = foo.function_by_name("value", FunctionType::Property).unwrap();
    assert_eq!(value.function_type(), FunctionType::Property);
    assert!(value.prop_readable());
    assert!(value.prop_writable());
    assert_eq!(value.class(), Some(foo));
    assert!(foo.function_by_name("value", FunctionType::Method).is_none());
    assert!(foo.function_by_name("ping", FunctionType::Unresolved).is_none());

    let any = foo.function_by_name("value", FunctionType::Unresolved).unwrap();
    assert_eq!(any, value);
    assert_eq!(any.getter_scope(), ObjectScope::Public);
    assert_eq!(any.setter_scope(), ObjectScope::Protected);
    assert_eq!(any.method_scope(), ObjectScope::Unknown);
    assert_eq!(
        value
            .property_values(FunctionType::PropSet)
            .map(|parameter| parameter.name())
            .collect::<Vec<_>>(),
        ["v"]
    );
    assert_eq!(
        value
            .property_values(FunctionType::PropGet)
            .next()
            .and_then(|parameter| parameter.parameter_type())
            .map(|ty| ty.builtin_type()),
        Some(BuiltinType::Int)
    );
    assert_eq!(
        value.full_c_name(FunctionType::PropGet, false),
        "foo_value_get"
    );

    let implements = foo.implements().collect::<Vec<_>>();
    assert_eq!(
        implements
            .iter()
            .map(|implement| implement.full_name())
            .collect::<Vec<_>>(),
        ["Foo.value", "Bar.ping"]
    );
    assert!(implements[0].is_prop_get() && implements[0].is_prop_set());
    assert_eq!(value.implement(), Some(implements[0]));
    assert_eq!(implements[1].class(), Some(bar));
    assert_eq!(implements[1].implementing_class(), Some(foo));

    let constructor = foo.constructors().next().unwrap();
    assert_eq!(constructor.full_name(), "Bar.ping");
    assert!(constructor.is_optional());
    assert_eq!(constructor.class(), Some(bar));

    assert_eq!(foo.c_name(), "FOO_CLASS");
    assert_eq!(bar.c_name(), "BAR_INTERFACE");
    assert_eq!(foo.c_data_type(), "Foo_Data");
}

#[test]
fn c_names_of_namespaced_class() {
    let (_directory, mut database) = scanned(&[(
        "efl_loop.eo",
        r#"(class: (
            name: "Efl.Loop",
            legacy_prefix: "ecore_loop",
            methods: [(name: "begin")],
            events: [(name: "child,added", type: (name: "int"))],
        ))"#,
    )]);

    database.try_file_parse("efl_loop.eo").unwrap();

    let class = database.class_by_file("efl_loop.eo").unwrap();
    assert_eq!(class.name(), "Loop");
    assert_eq!(class.namespaces().collect::<Vec<_>>(), ["Efl"]);
    assert_eq!(class.c_name(), "EFL_LOOP_CLASS");
    assert_eq!(class.c_get_function_name(), "efl_loop_class_get");
    assert_eq!(class.c_data_type(), "Efl_Loop_Data");

    let event = class.event_by_name("child,added").unwrap();
    assert_eq!(event.c_name(), "EFL_LOOP_EVENT_CHILD_ADDED");
    assert_eq!(event.event_type().unwrap().c_type(), "int");

    let begin = class.function_by_name("begin", FunctionType::Method).unwrap();
    assert_eq!(
        begin.full_c_name(FunctionType::Method, false),
        "efl_loop_begin"
    );
    assert_eq!(
        begin.full_c_name(FunctionType::Method, true),
        "ecore_loop_begin"
    );
}

#[test]
fn struct_fields_and_c_type() {
    let (_directory, mut database) = scanned(&[(
        "geo.eot",
        r#"(structs: [(
            name: "Geo.Point",
            fields: [
                (name: "x", type: (name: "int")),
                (name: "y", type: (name: "int")),
                (name: "weight", type: (name: "double")),
            ],
        )])"#,
    )]);

    database.try_file_parse("geo.eot").unwrap();

    let point = database.struct_by_name("Geo.Point").unwrap();
    assert_eq!(point.typedecl_type(), TypedeclType::Struct);
    assert_eq!(
        point.struct_fields().map(|field| field.name()).collect::<Vec<_>>(),
        ["x", "y", "weight"]
    );
    assert_eq!(
        point.struct_field("weight").and_then(|field| field.field_type()).map(
            |ty| ty.builtin_type()
        ),
        Some(BuiltinType::Double)
    );
    assert!(point.struct_field("z").is_none());
    assert_eq!(
        point.c_type(),
        "struct Geo_Point { int x; int y; double weight; }"
    );

    let declaration = database.declaration_by_name("Geo.Point").unwrap();
    assert_eq!(declaration.declaration_type(), DeclarationType::Struct);
    assert_eq!(declaration.typedecl(), Some(point));
    assert!(declaration.class().is_none());
}

#[test]
fn enum_fields_count_up_from_the_previous_value() {
    let (_directory, mut database) = scanned(&[(
        "geo.eot",
        r#"(enums: [(
            name: "Geo.Dir",
            fields: [(name: "a"), (name: "b", value: "5"), (name: "c")],
        )])"#,
    )]);

    database.try_file_parse("geo.eot").unwrap();

    let direction = database.enum_by_name("Geo.Dir").unwrap();
    let values = direction
        .enum_fields()
        .map(|field| field.value(true).unwrap().evaluate(ExpressionMask::INT))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(values, [Value::Int(0), Value::Int(5), Value::Int(6)]);

    let a = direction.enum_field("a").unwrap();
    assert!(!a.is_explicit());
    assert!(a.value(false).is_none());
    assert!(direction.enum_field("b").unwrap().value(false).is_some());
    assert_eq!(direction.enum_field("c").unwrap().c_name(), "GEO_DIR_C");
    assert_eq!(direction.c_type(), "enum Geo_Dir { a = 0, b = 5, c = 6 }");
}

#[test]
fn long_runs_of_implicit_enum_values() {
    let implicit = |prefix: &str| {
        (0..300).map(|i| format!("(name: \"{prefix}{i}\")")).collect::<Vec<_>>()
    };
    let mut anchored = vec![r#"(name: "start", value: "10")"#.to_owned()];
    anchored.extend(implicit("g"));

    let text = format!(
        "(enums: [(name: \"Big.Plain\", fields: [{}]), \
         (name: \"Big.Anchored\", fields: [{}])])",
        implicit("f").join(", "),
        anchored.join(", ")
    );
    let (_directory, mut database) = scanned(&[("big.eot", &text)]);

    database.try_file_parse("big.eot").unwrap();

    let value = |typedecl: &str, field: &str| {
        database
            .enum_by_name(typedecl)
            .unwrap()
            .enum_field(field)
            .unwrap()
            .value(true)
            .unwrap()
            .evaluate(ExpressionMask::INT)
    };

    assert_eq!(value("Big.Plain", "f0"), Ok(Value::Int(0)));
    assert_eq!(value("Big.Plain", "f299"), Ok(Value::Int(299)));
    assert_eq!(value("Big.Anchored", "g0"), Ok(Value::Int(11)));
    assert_eq!(value("Big.Anchored", "g299"), Ok(Value::Int(310)));

    let plain = database.enum_by_name("Big.Plain").unwrap().c_type();
    assert!(plain.ends_with("f298 = 298, f299 = 299 }"));
}

#[test]
fn constants_evaluate_through_names() {
    let (_directory, mut database) = scanned(&[(
        "consts.eot",
        r#"(
            enums: [(name: "Geo.Dir", fields: [(name: "a"), (name: "b", value: "5"), (name: "c")])],
            constants: [
                (name: "Geo.Flags", type: (name: "int"), value: "1 << 3 | 1"),
                (name: "Geo.Sum", type: (name: "int"), value: "Geo.Flags + Geo.Dir.c"),
                (name: "Geo.Bad", type: (name: "int"), value: "Geo.Counter + 1"),
                (name: "Geo.Unknown", type: (name: "int"), value: "Geo.Nothing"),
                (name: "Geo.Zero", type: (name: "int"), value: "1 / 0"),
                (name: "Geo.Big", type: (name: "int"), value: "2147483647 + 1"),
                (name: "Geo.Wide", type: (name: "long"), value: "2147483647L + 1"),
                (name: "Geo.Yes", type: (name: "bool"), value: "!(1 > 2)"),
            ],
            globals: [(name: "Geo.Counter", type: (name: "int"), value: "0")],
        )"#,
    )]);

    database.try_file_parse("consts.eot").unwrap();

    let evaluate = |name: &str, mask| {
        database.constant_by_name(name).unwrap().value().unwrap().evaluate(mask)
    };

    assert_eq!(evaluate("Geo.Flags", ExpressionMask::INT), Ok(Value::Int(9)));
    assert_eq!(evaluate("Geo.Sum", ExpressionMask::INT), Ok(Value::Int(15)));
    assert_eq!(
        evaluate("Geo.Flags", ExpressionMask::STRING),
        Err(EvaluationError::MaskMismatch {
            expected: ExpressionMask::STRING,
            found: crate::expression::ExpressionType::Int,
        })
    );
    assert_eq!(
        evaluate("Geo.Bad", ExpressionMask::INT),
        Err(EvaluationError::NotConstant("Geo.Counter".to_owned()))
    );
    assert_eq!(
        evaluate("Geo.Unknown", ExpressionMask::ALL),
        Err(EvaluationError::UndefinedName("Geo.Nothing".to_owned()))
    );
    assert_eq!(
        evaluate("Geo.Zero", ExpressionMask::INT),
        Err(EvaluationError::DivisionByZero)
    );
    assert_eq!(
        evaluate("Geo.Big", ExpressionMask::INT),
        Err(EvaluationError::Overflow)
    );
    assert_eq!(
        evaluate("Geo.Wide", ExpressionMask::INT),
        Ok(Value::Long(2_147_483_648))
    );

    let yes = evaluate("Geo.Yes", ExpressionMask::BOOL).unwrap();
    assert_eq!(yes, Value::Bool(true));
    assert_eq!(yes.to_literal(), "EINA_TRUE");

    let flags = database.constant_by_name("Geo.Flags").unwrap();
    assert_eq!(flags.value().unwrap().serialize().unwrap(), "(1 << 3) | 1");
    assert_eq!(flags.base_type().unwrap().c_type(), "int");

    let counter = database.global_by_name("Geo.Counter").unwrap();
    assert!(database.constant_by_name("Geo.Counter").is_none());
    assert_eq!(
        database.declaration_by_name("Geo.Counter").unwrap().variable(),
        Some(counter)
    );
}

#[test]
fn aliases_function_pointers_and_containers() {
    let (_directory, mut database) = scanned(&[(
        "kinds.eot",
        r#"(
            structs: [(name: "Kinds.Opaque", opaque: true)],
            aliases: [
                (name: "Kinds.Number", type: (name: "int")),
                (name: "Kinds.Again", type: (name: "Kinds.Number")),
                (name: "Kinds.Names", type: (
                    name: "list",
                    owned: true,
                    params: [(name: "string")],
                )),
            ],
            function_pointers: [(
                name: "Kinds.Cb",
                return: (type: (name: "bool")),
                parameters: [(name: "data", type: (name: "int"))],
            )],
        )"#,
    )]);

    database.try_file_parse("kinds.eot").unwrap();

    assert_eq!(
        database.struct_by_name("Kinds.Opaque").unwrap().c_type(),
        "struct Kinds_Opaque"
    );

    let again = database.alias_by_name("Kinds.Again").unwrap();
    let base = again.base_type().unwrap();
    assert_eq!(base.type_type(), TypeType::Regular);
    assert_eq!(
        base.typedecl().map(|typedecl| typedecl.full_name()),
        Some("Kinds.Number")
    );
    assert_eq!(base.aliased_base().builtin_type(), BuiltinType::Int);
    assert_eq!(again.c_type(), "typedef Kinds_Number Kinds_Again");

    let names =
        database.alias_by_name("Kinds.Names").unwrap().base_type().unwrap();
    assert!(names.is_owned());
    assert_eq!(names.builtin_type(), BuiltinType::List);
    assert_eq!(names.to_string(), "own(list<string>)");
    assert_eq!(
        names.parameters().map(|ty| ty.builtin_type()).collect::<Vec<_>>(),
        [BuiltinType::String]
    );

    let callback = database.alias_by_name("Kinds.Cb").unwrap();
    assert_eq!(callback.typedecl_type(), TypedeclType::FunctionPointer);
    assert_eq!(
        callback.function_pointer().unwrap().function_type(),
        FunctionType::FunctionPointer
    );
    assert_eq!(callback.c_type(), "typedef Eina_Bool (*Kinds_Cb)(int data)");
}

#[test]
fn documentation_and_literal_values() {
    let (_directory, mut database) = scanned(&[
        ("docs.eo", r#"(class: (
            name: "Docs",
            documentation: (
                summary: "A documented class.",
                description: "First line\n  continued.\n\n\n  Second.\n",
                since: "1.22",
            ),
        ))"#),
        ("docs.eot", r#"(constants: [
            (name: "Docs.Answer", type: (name: "int"), value: "42"),
            (name: "Docs.Copy", type: (name: "int"), value: "Docs.Answer"),
        ])"#),
    ]);

    assert!(database.all_eot_files_parse());
    database.try_file_parse("docs.eo").unwrap();

    let docs = database.class_by_name("Docs").unwrap().documentation().unwrap();
    assert_eq!(docs.summary(), "A documented class.");
    assert_eq!(docs.since(), Some("1.22"));
    assert_eq!(docs.paragraphs().collect::<Vec<_>>(), [
        "First line\ncontinued.".to_owned(),
        "Second.".to_owned()
    ]);

    let answer = database.constant_by_name("Docs.Answer").unwrap();
    assert_eq!(answer.value().unwrap().value(), Some(Value::Int(42)));

    let copy = database.constant_by_name("Docs.Copy").unwrap();
    assert_eq!(copy.value().unwrap().value(), None);
    assert_eq!(
        copy.value().unwrap().evaluate(ExpressionMask::INT),
        Ok(Value::Int(42))
    );
}

#[test]
fn getter_only_property_has_no_setter_scope() {
    let (_directory, mut database) = scanned(&[(
        "gauge.eo",
        r#"(class: (
            name: "Gauge",
            properties: [(name: "level", get: (scope: Private))],
        ))"#,
    )]);

    database.try_file_parse("gauge.eo").unwrap();

    let gauge = database.class_by_name("Gauge").unwrap();
    let level =
        gauge.function_by_name("level", FunctionType::Unresolved).unwrap();

    assert_eq!(level.getter_scope(), ObjectScope::Private);
    assert_eq!(level.setter_scope(), ObjectScope::Unknown);
    assert!(level.prop_readable());
    assert!(!level.prop_writable());
    assert!(gauge.function_by_name("level", FunctionType::PropSet).is_none());
}

#[test]
fn stored_expressions_can_be_walked() {
    let (_directory, mut database) = scanned(&[(
        "walk.eot",
        r#"(constants: [
            (name: "Walk.Sum", type: (name: "int"), value: "2 + 3"),
            (name: "Walk.Neg", type: (name: "int"), value: "-(1 * 4)"),
        ])"#,
    )]);

    database.try_file_parse("walk.eot").unwrap();

    let sum = database.constant_by_name("Walk.Sum").unwrap().value().unwrap();
    assert_eq!(sum.expression_type(), ExpressionType::Binary);
    assert_eq!(sum.binary_operator(), BinaryOperator::Add);
    assert_eq!(sum.binary_lhs().unwrap().serialize().as_deref(), Some("2"));
    assert_eq!(sum.binary_rhs().unwrap().value(), Some(Value::Int(3)));
    assert_eq!(sum.unary_operator(), UnaryOperator::Invalid);
    assert!(sum.unary_operand().is_none());
    assert_eq!(sum.serialize().as_deref(), Some("2 + 3"));

    let negated =
        database.constant_by_name("Walk.Neg").unwrap().value().unwrap();
    assert_eq!(negated.expression_type(), ExpressionType::Unary);
    assert_eq!(negated.unary_operator(), UnaryOperator::Unm);
    assert_eq!(negated.binary_operator(), BinaryOperator::Invalid);
    assert!(negated.binary_lhs().is_none());

    let operand = negated.unary_operand().unwrap();
    assert_eq!(operand.binary_operator(), BinaryOperator::Mul);
    assert_eq!(operand.serialize().as_deref(), Some("1 * 4"));
    assert_eq!(negated.evaluate(ExpressionMask::INT), Ok(Value::Int(-4)));
}

#[test]
fn diamond_inheritance_lists_each_ancestor_once() {
    let (_directory, mut database) = scanned(&[
        ("a.eo", r#"(class: (name: "A"))"#),
        ("b.eo", r#"(class: (name: "B", inherits: ["A"]))"#),
        ("c.eo", r#"(class: (name: "C", inherits: ["A"]))"#),
        ("d.eo", r#"(class: (name: "D", inherits: ["B", "C"]))"#),
    ]);

    database.try_file_parse("d.eo").unwrap();

    let d = database.class_by_name("D").unwrap();

    assert_eq!(
        d.inherits_full().map(|class| class.full_name()).collect::<Vec<_>>(),
        ["B", "A", "C"]
    );
    assert_eq!(
        d.inherits().map(|class| class.full_name()).collect::<Vec<_>>(),
        ["B", "C"]
    );
}

#[test]
fn absent_objects_are_none() {
    let (_directory, database) = scanned(&[]);

    assert!(database.class_by_name("Nope").is_none());
    assert!(database.class_by_file("nope.eo").is_none());
    assert!(database.struct_by_name("Nope").is_none());
    assert!(database.enum_by_name("Nope").is_none());
    assert!(database.alias_by_name("Nope").is_none());
    assert!(database.constant_by_name("Nope").is_none());
    assert!(database.global_by_name("Nope").is_none());
    assert!(database.declaration_by_name("Nope").is_none());
    assert_eq!(database.all_classes().count(), 0);
    assert!(database.unit_for_file("nope.eot").is_none());
}

#[test]
fn inheritance_cycles_terminate() {
    let (_directory, mut database) = scanned(&[
        ("a.eo", r#"(class: (name: "A", inherits: ["B"]))"#),
        ("b.eo", r#"(class: (name: "B", inherits: ["A"]))"#),
    ]);

    database.try_file_parse("a.eo").unwrap();

    let a = database.class_by_name("A").unwrap();
    let b = database.class_by_name("B").unwrap();

    assert_eq!(a.inherits_full().collect::<Vec<_>>(), [b]);
    assert_eq!(b.inherits_full().collect::<Vec<_>>(), [a]);
}

#[test]
fn failed_file_leaves_nothing_behind() {
    let (directory, mut database) = scanned(&[(
        "broken.eot",
        r#"(
            structs: [(name: "Ok.Struct")],
            aliases: [(name: "Bad.Alias", type: (name: "Missing.Type"))],
        )"#,
    )]);

    let error = database.try_file_parse("broken.eot").unwrap_err();
    assert!(matches!(
        error,
        Error::UnresolvedType(name) if name == "Missing.Type"
    ));

    assert!(!database.is_parsed("broken.eot"));
    assert!(database.struct_by_name("Ok.Struct").is_none());
    assert!(database.declaration_by_name("Bad.Alias").is_none());
    assert_eq!(database.all_declarations().count(), 0);
    assert!(database.storage().typedecls.is_empty());
    assert!(database.storage().declarations.is_empty());
    assert!(database.storage().types.is_empty());

    // the names are free again once the file is fixed
    write(
        directory.path(),
        "broken.eot",
        r#"(
            structs: [(name: "Ok.Struct")],
            aliases: [(name: "Bad.Alias", type: (name: "Ok.Struct"))],
        )"#,
    );

    database.try_file_parse("broken.eot").unwrap();
    assert!(database.struct_by_name("Ok.Struct").is_some());
    assert!(database.alias_by_name("Bad.Alias").is_some());
}

#[test]
fn stale_handles_do_not_resolve() {
    let (directory, mut database) = scanned(&[(
        "late.eot",
        r#"(structs: [(name: "Late", fields: [(name: "x", type: (name: "Gone"))])])"#,
    )]);

    let next = database.storage().typedecls.next_id();
    assert!(database.try_file_parse("late.eot").is_err());
    assert!(database.view(next).is_err());

    write(directory.path(), "late.eot", r#"(structs: [(name: "Late")])"#);
    database.try_file_parse("late.eot").unwrap();

    let late = database.struct_by_name("Late").unwrap();
    assert_ne!(late.id(), next);
    assert!(database.view(next).is_err());
    assert_eq!(database.view(late.id()).unwrap(), late);
}

#[test]
fn redefinition_across_files() {
    let (_directory, mut database) = scanned(&[
        ("a.eot", r#"(structs: [(name: "Dup")])"#),
        ("b.eot", r#"(enums: [(name: "Dup"), (name: "Other")])"#),
    ]);

    database.try_file_parse("a.eot").unwrap();

    let error = database.try_file_parse("b.eot").unwrap_err();
    assert!(matches!(
        error,
        Error::Redefinition { ref name, ref file }
            if name == "Dup" && file == "a.eot"
    ));

    assert!(database.struct_by_name("Dup").is_some());
    assert!(database.enum_by_name("Dup").is_none());
    assert!(database.enum_by_name("Other").is_none());
}

#[test]
fn duplicate_members_are_rejected() {
    let (_directory, mut database) = scanned(&[
        ("same.eot", r#"(structs: [(name: "S"), (name: "S")])"#),
        (
            "fields.eot",
            r#"(structs: [(name: "T", fields: [
                (name: "x", type: (name: "int")),
                (name: "x", type: (name: "int")),
            ])])"#,
        ),
        (
            "empty.eo",
            r#"(class: (name: "Empty", properties: [(name: "nothing")]))"#,
        ),
    ]);

    assert!(matches!(
        database.try_file_parse("same.eot"),
        Err(Error::Redefinition { ref file, .. }) if file == "same.eot"
    ));
    assert!(matches!(
        database.try_file_parse("fields.eot"),
        Err(Error::DuplicateMember { ref owner, ref name })
            if owner == "T" && name == "x"
    ));
    assert!(matches!(
        database.try_file_parse("empty.eo"),
        Err(Error::EmptyProperty { .. })
    ));
}

#[test]
fn file_kinds_are_checked() {
    let (_directory, mut database) = scanned(&[
        ("classless.eo", "()"),
        ("classy.eot", r#"(class: (name: "Classy"))"#),
    ]);

    assert!(matches!(
        database.try_file_parse("classless.eo"),
        Err(Error::MissingClass(file)) if file == "classless.eo"
    ));
    assert!(matches!(
        database.try_file_parse("classy.eot"),
        Err(Error::UnexpectedClass(file)) if file == "classy.eot"
    ));
    assert!(matches!(
        database.try_file_parse("absent.eot"),
        Err(Error::UnknownFile(_))
    ));
}

#[test]
fn dependency_failures_are_wrapped() {
    let (_directory, mut database) = scanned(&[
        ("broken.eo", "()"),
        ("child.eo", r#"(class: (name: "Child", inherits: ["Broken"]))"#),
        ("user.eot", r#"(imports: ["missing"])"#),
    ]);

    let Err(Error::Dependency { file, source }) =
        database.try_file_parse("child.eo")
    else {
        panic!("expected a dependency error");
    };

    assert_eq!(file, "child.eo");
    assert!(matches!(*source, Error::MissingClass(_)));
    assert!(database.class_by_name("Child").is_none());

    assert!(matches!(
        database.try_file_parse("user.eot"),
        Err(Error::UnknownFile(name)) if name == "missing"
    ));
}

#[test]
fn implements_must_name_inherited_classes() {
    let (_directory, mut database) = scanned(&[
        ("bar.eo", BAR),
        (
            "lone.eo",
            r#"(class: (name: "Lone", implements: [(name: "Bar.ping")]))"#,
        ),
        (
            "getter.eo",
            r#"(class: (
                name: "Getter",
                properties: [(name: "size", get: ())],
                implements: [(name: ".size", set: true)],
            ))"#,
        ),
        (
            "ctor.eo",
            r#"(class: (
                name: "Ctor",
                implements: [(name: "class.constructor")],
            ))"#,
        ),
    ]);

    assert!(matches!(
        database.try_file_parse("lone.eo"),
        Err(Error::NotInherited { ref class, ref inherited })
            if class == "Lone" && inherited == "Bar"
    ));
    assert!(matches!(
        database.try_file_parse("getter.eo"),
        Err(Error::UnknownFunction { .. })
    ));

    database.try_file_parse("ctor.eo").unwrap();
    let ctor = database.class_by_name("Ctor").unwrap();
    assert!(ctor.ctor_enable());
    assert!(!ctor.dtor_enable());
    assert_eq!(ctor.implements().count(), 0);
}

#[test]
fn imports_load_types_first() {
    let (_directory, mut database) = scanned(&[
        ("base.eot", r#"(structs: [(name: "Base.Thing")])"#),
        (
            "user.eot",
            r#"(
                imports: ["base"],
                aliases: [(name: "User.Thing", type: (name: "Base.Thing", ptr: true))],
            )"#,
        ),
    ]);

    database.try_file_parse("user.eot").unwrap();

    assert!(database.is_parsed("base.eot"));

    let thing =
        database.alias_by_name("User.Thing").unwrap().base_type().unwrap();
    assert!(thing.is_ptr());
    assert_eq!(thing.c_type(), "Base_Thing *");
    assert_eq!(thing.to_string(), "ptr(Base.Thing)");
}

#[test]
fn scanning_keeps_the_first_file_name() {
    let (directory, database) = scanned(&[
        ("a/x.eot", "()"),
        ("b/x.eot", "()"),
        ("b/nested/y.eo", r#"(class: (name: "Y"))"#),
        ("notes.txt", "not an interface file"),
    ]);

    assert_eq!(database.all_eot_files().collect::<Vec<_>>(), ["x.eot"]);
    assert_eq!(database.all_eo_files().collect::<Vec<_>>(), ["y.eo"]);
    assert_eq!(
        database.all_eot_file_paths().collect::<Vec<_>>(),
        [directory.path().join("a/x.eot").as_path()]
    );
}

#[test]
fn scanning_a_file_is_an_error() {
    let (directory, mut database) = scanned(&[("x.eot", "()")]);

    assert!(matches!(
        database.try_directory_scan(directory.path().join("x.eot")),
        Err(Error::NotADirectory(_))
    ));
    assert!(!database.directory_scan(directory.path().join("missing")));
}

#[test]
fn units_are_scoped_to_their_file() {
    let (_directory, mut database) = scanned(&[
        ("one.eot", r#"(structs: [(name: "One")])"#),
        ("two.eot", r#"(structs: [(name: "Two")])"#),
    ]);

    assert!(database.all_eot_files_parse());

    let unit = database.unit_for_file("one.eot").unwrap();
    assert_eq!(unit.file(), Some("one.eot"));
    assert!(unit.struct_by_name("One").is_some());
    assert!(unit.struct_by_name("Two").is_none());
    assert_eq!(unit.all_structs().count(), 1);
    assert_eq!(unit.structs_by_file("two.eot").count(), 0);

    assert_eq!(
        database
            .all_structs()
            .map(|typedecl| typedecl.name())
            .collect::<Vec<_>>(),
        ["One", "Two"]
    );
    assert_eq!(
        database
            .structs_by_file("two.eot")
            .map(|typedecl| typedecl.name())
            .collect::<Vec<_>>(),
        ["Two"]
    );
    assert_eq!(database.unit().all_structs().count(), 2);
}

#[test]
fn bulk_parse_reports_every_failure() {
    let (_directory, mut database) = scanned(&[
        ("bad_one.eo", "()"),
        ("bad_two.eo", "()"),
        ("good.eo", r#"(class: (name: "Good"))"#),
    ]);

    let errors = database.try_all_eo_files_parse().unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(database.class_by_name("Good").is_some());
}

#[test]
fn parse_by_path_registers_the_file() {
    let directory = tempfile::tempdir().unwrap();
    write(directory.path(), "solo.eot", r#"(structs: [(name: "Solo")])"#);

    let mut database = Session::default().database();
    let path = directory.path().join("solo.eot");

    assert!(database.file_parse(path.to_str().unwrap()).is_some());
    assert!(database.struct_by_name("Solo").is_some());
    assert_eq!(database.all_eot_files().collect::<Vec<_>>(), ["solo.eot"]);

    // the registered path itself parses again
    assert!(database.try_file_parse(path.to_str().unwrap()).is_ok());

    write(directory.path(), "notes.txt", "");
    let notes = directory.path().join("notes.txt");
    assert!(matches!(
        database.try_file_parse(notes.to_str().unwrap()),
        Err(Error::UnsupportedFile(_))
    ));
}

#[test]
fn parse_by_path_rejects_a_shadowed_file_name() {
    let (directory, mut database) =
        scanned(&[("solo.eot", r#"(structs: [(name: "Solo")])"#)]);
    write(
        directory.path(),
        "other/solo.eot",
        r#"(structs: [(name: "Other")])"#,
    );

    let other = directory.path().join("other").join("solo.eot");
    let error = database.try_file_parse(other.to_str().unwrap()).unwrap_err();

    assert!(matches!(
        error,
        Error::ShadowedFile { ref path, .. } if *path == other
    ));
    assert!(!database.is_parsed("solo.eot"));
    assert!(database.struct_by_name("Other").is_none());

    database.try_file_parse("solo.eot").unwrap();
    assert!(database.struct_by_name("Solo").is_some());
}
