#![allow(dead_code)]

pub mod fixtures {
    //! Hydratable types shared by the integration tests.
    //!
    //! Derived types cover plain field-populated structs; the `*_def` functions
    //! register constructor-driven types by hand.

    use hydrator::{
        Arguments, ClassDef, FieldDef, Hydrate, HydrationError, Input, TypeDef, TypeRegistry,
    };
    use serde_json::{json, Value as JsonValue};

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct EmptyClass {}

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithStringField {
        #[hydrate(rename = "someField")]
        pub some_field: String,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithNullableStringField {
        #[hydrate(rename = "someField")]
        pub some_field: Option<String>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithArrayField {
        #[hydrate(rename = "arrayField")]
        pub array_field: Vec<JsonValue>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithAnotherEmptyClassField {
        #[hydrate(rename = "someClass")]
        pub some_class: EmptyClass,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithClassWithParameters {
        #[hydrate(rename = "classField")]
        pub class_field: ClassWithNullableStringField,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithNullableScalarTypes {
        #[hydrate(rename = "boolField")]
        pub bool_field: Option<bool>,
        #[hydrate(rename = "intField")]
        pub int_field: Option<i64>,
        #[hydrate(rename = "stringField")]
        pub string_field: Option<String>,
        #[hydrate(rename = "floatField")]
        pub float_field: Option<f64>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithAnotherClassThatContainsArrayMapper {
        #[hydrate(map_each = "ClassWithStringField")]
        pub array: Vec<ClassWithStringField>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithInterface {
        #[hydrate(rename = "someField")]
        pub some_field: String,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithAnotherInterfaceClass {
        #[hydrate(
            rename = "someClassProperty",
            ty = "SomeClassInterface",
            map_to = "ClassWithInterface"
        )]
        pub some_class_property: ClassWithInterface,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct Point {
        pub x: i64,
        pub y: i64,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithMomentProperty {
        #[hydrate(rename = "dateTime")]
        pub date_time: Moment,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithMomentInterfaceMapper {
        #[hydrate(rename = "dateTime", ty = "MomentInterface", map_to = "Moment")]
        pub date_time: Moment,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithMomentList {
        #[hydrate(map_each = "Moment")]
        pub moments: Vec<Moment>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Hydrate)]
    pub struct ClassWithReadonlyField {
        #[hydrate(readonly)]
        pub id: i64,
        #[hydrate(default = "guest")]
        pub role: String,
        #[hydrate(skip)]
        pub cached: bool,
    }

    /// Timestamp built from a single `"YYYY-MM-DD HH:MM"` string.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Moment {
        pub value: String,
    }
    hydrator::object_value!(Moment);

    pub const EPOCH: &str = "1970-01-01 00:00";

    pub fn moment_def() -> TypeDef {
        ClassDef::<Moment>::constructed_by(
            "Moment",
            [FieldDef::new("value").typed("string").default(json!(EPOCH))],
            |args: &mut Arguments| -> Result<Moment, HydrationError> {
                Ok(Moment {
                    value: args.take("value")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithScalarTypesInConstructor {
        pub int_field: i64,
        pub bool_field: bool,
        pub float_field: f64,
        pub string_field: String,
    }
    hydrator::object_value!(ClassWithScalarTypesInConstructor);

    fn scalar_params(types: [&str; 4]) -> [FieldDef; 4] {
        [
            FieldDef::new("intField").typed(types[0]).promoted(),
            FieldDef::new("boolField").typed(types[1]).promoted(),
            FieldDef::new("floatField").typed(types[2]).promoted(),
            FieldDef::new("stringField").typed(types[3]).promoted(),
        ]
    }

    pub fn scalar_ctor_def() -> TypeDef {
        ClassDef::<ClassWithScalarTypesInConstructor>::constructed_by(
            "ClassWithScalarTypesInConstructor",
            scalar_params(["int", "bool", "float", "string"]),
            |args: &mut Arguments| -> Result<ClassWithScalarTypesInConstructor, HydrationError> {
                Ok(ClassWithScalarTypesInConstructor {
                    int_field: args.take("intField")?,
                    bool_field: args.take("boolField")?,
                    float_field: args.take("floatField")?,
                    string_field: args.take("stringField")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithDefaultedScalarsInConstructor {
        pub int_field: i64,
        pub bool_field: bool,
        pub float_field: f64,
        pub string_field: String,
    }
    hydrator::object_value!(ClassWithDefaultedScalarsInConstructor);

    pub fn defaulted_scalar_ctor_def() -> TypeDef {
        let [int_p, bool_p, float_p, string_p] = scalar_params(["int", "bool", "float", "string"]);
        ClassDef::<ClassWithDefaultedScalarsInConstructor>::constructed_by(
            "ClassWithDefaultedScalarsInConstructor",
            [
                int_p.default(json!(0)).readonly(),
                bool_p.default(json!(false)).readonly(),
                float_p.default(json!(0.0)).readonly(),
                string_p.default(json!("")).readonly(),
            ],
            |args: &mut Arguments| -> Result<ClassWithDefaultedScalarsInConstructor, HydrationError> {
                Ok(ClassWithDefaultedScalarsInConstructor {
                    int_field: args.take("intField")?,
                    bool_field: args.take("boolField")?,
                    float_field: args.take("floatField")?,
                    string_field: args.take("stringField")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithReadonlyNullableScalarTypesInConstructor {
        pub int_field: Option<i64>,
        pub bool_field: Option<bool>,
        pub float_field: Option<f64>,
        pub string_field: Option<String>,
    }
    hydrator::object_value!(ClassWithReadonlyNullableScalarTypesInConstructor);

    pub fn readonly_nullable_ctor_def() -> TypeDef {
        let params = scalar_params(["?int", "?bool", "?float", "?string"]).map(FieldDef::readonly);
        ClassDef::<ClassWithReadonlyNullableScalarTypesInConstructor>::constructed_by(
            "ClassWithReadonlyNullableScalarTypesInConstructor",
            params,
            |args: &mut Arguments| -> Result<ClassWithReadonlyNullableScalarTypesInConstructor, HydrationError> {
                Ok(ClassWithReadonlyNullableScalarTypesInConstructor {
                    int_field: args.take("intField")?,
                    bool_field: args.take("boolField")?,
                    float_field: args.take("floatField")?,
                    string_field: args.take("stringField")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithAnotherClassInConstructor {
        pub string_field_class: ClassWithStringField,
    }
    hydrator::object_value!(ClassWithAnotherClassInConstructor);

    pub fn class_in_ctor_def() -> TypeDef {
        ClassDef::<ClassWithAnotherClassInConstructor>::constructed_by(
            "ClassWithAnotherClassInConstructor",
            [FieldDef::new("stringFieldClass")
                .typed("ClassWithStringField")
                .promoted()],
            |args: &mut Arguments| -> Result<ClassWithAnotherClassInConstructor, HydrationError> {
                Ok(ClassWithAnotherClassInConstructor {
                    string_field_class: args.take("stringFieldClass")?,
                })
            },
        )
        .build()
    }

    /// Keeps its nested instance private; only a constructor parameter, no field.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithAnotherClassInConstructorAsSimpleArgument {
        private_class: ClassWithStringField,
    }
    hydrator::object_value!(ClassWithAnotherClassInConstructorAsSimpleArgument);

    impl ClassWithAnotherClassInConstructorAsSimpleArgument {
        pub fn class(&self) -> &ClassWithStringField {
            &self.private_class
        }
    }

    pub fn simple_argument_def() -> TypeDef {
        ClassDef::<ClassWithAnotherClassInConstructorAsSimpleArgument>::constructed_by(
            "ClassWithAnotherClassInConstructorAsSimpleArgument",
            [FieldDef::new("classParameter").typed("ClassWithStringField")],
            |args: &mut Arguments| -> Result<ClassWithAnotherClassInConstructorAsSimpleArgument, HydrationError> {
                Ok(ClassWithAnotherClassInConstructorAsSimpleArgument {
                    private_class: args.take("classParameter")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithArrayFieldInConstructor {
        pub array_field: Vec<JsonValue>,
    }
    hydrator::object_value!(ClassWithArrayFieldInConstructor);

    pub fn array_in_ctor_def(name: &str, default: Option<JsonValue>) -> TypeDef {
        let mut param = FieldDef::new("arrayField").typed("array").promoted();
        if let Some(default) = default {
            param = param.default(default);
        }
        ClassDef::<ClassWithArrayFieldInConstructor>::constructed_by(
            name,
            [param],
            |args: &mut Arguments| -> Result<ClassWithArrayFieldInConstructor, HydrationError> {
                Ok(ClassWithArrayFieldInConstructor {
                    array_field: args.take("arrayField")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithArrayMapperInConstructor {
        pub array: Vec<ClassWithStringField>,
    }
    hydrator::object_value!(ClassWithArrayMapperInConstructor);

    pub fn array_mapper_in_ctor_def() -> TypeDef {
        ClassDef::<ClassWithArrayMapperInConstructor>::constructed_by(
            "ClassWithArrayMapperInConstructor",
            [FieldDef::new("array")
                .typed("array")
                .map_each("ClassWithStringField")
                .promoted()],
            |args: &mut Arguments| -> Result<ClassWithArrayMapperInConstructor, HydrationError> {
                Ok(ClassWithArrayMapperInConstructor {
                    array: args.take("array")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClassWithAnotherInterfaceClassInConstructor {
        pub some_class_property: ClassWithInterface,
    }
    hydrator::object_value!(ClassWithAnotherInterfaceClassInConstructor);

    pub fn interface_in_ctor_def() -> TypeDef {
        ClassDef::<ClassWithAnotherInterfaceClassInConstructor>::constructed_by(
            "ClassWithAnotherInterfaceClassInConstructor",
            [FieldDef::new("someClassProperty")
                .typed("SomeClassInterface")
                .map_to("ClassWithInterface")
                .promoted()],
            |args: &mut Arguments| -> Result<ClassWithAnotherInterfaceClassInConstructor, HydrationError> {
                Ok(ClassWithAnotherInterfaceClassInConstructor {
                    some_class_property: args.take("someClassProperty")?,
                })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Wrapper {
        pub p: Point,
    }
    hydrator::object_value!(Wrapper);

    pub fn wrapper_def() -> TypeDef {
        ClassDef::<Wrapper>::constructed_by(
            "Wrapper",
            [FieldDef::new("p").typed("Point")],
            |args: &mut Arguments| -> Result<Wrapper, HydrationError> {
                Ok(Wrapper { p: args.take("p")? })
            },
        )
        .build()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RequiresField {
        pub required_field: String,
    }
    hydrator::object_value!(RequiresField);

    pub fn requires_field_def() -> TypeDef {
        ClassDef::<RequiresField>::constructed_by(
            "RequiresField",
            [FieldDef::new("requiredField").typed("string")],
            |args: &mut Arguments| -> Result<RequiresField, HydrationError> {
                Ok(RequiresField {
                    required_field: args.take("requiredField")?,
                })
            },
        )
        .build()
    }

    /// Every fixture, registered once.
    pub fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with_type::<EmptyClass>()
            .with_type::<ClassWithStringField>()
            .with_type::<ClassWithNullableStringField>()
            .with_type::<ClassWithArrayField>()
            .with_type::<ClassWithAnotherEmptyClassField>()
            .with_type::<ClassWithClassWithParameters>()
            .with_type::<ClassWithNullableScalarTypes>()
            .with_type::<ClassWithAnotherClassThatContainsArrayMapper>()
            .with_type::<ClassWithInterface>()
            .with_type::<ClassWithAnotherInterfaceClass>()
            .with_type::<Point>()
            .with_type::<ClassWithMomentProperty>()
            .with_type::<ClassWithMomentInterfaceMapper>()
            .with_type::<ClassWithMomentList>()
            .with_type::<ClassWithReadonlyField>()
            .with(TypeDef::interface("SomeClassInterface"))
            .with(TypeDef::interface("MomentInterface"))
            .with(moment_def())
            .with(scalar_ctor_def())
            .with(defaulted_scalar_ctor_def())
            .with(readonly_nullable_ctor_def())
            .with(class_in_ctor_def())
            .with(simple_argument_def())
            .with(array_in_ctor_def("ClassWithArrayFieldInConstructor", None))
            .with(array_in_ctor_def(
                "ClassWithDefaultedArrayFieldInConstructor",
                Some(json!([])),
            ))
            .with(array_mapper_in_ctor_def())
            .with(interface_in_ctor_def())
            .with(wrapper_def())
            .with(requires_field_def())
    }

    /// Unwrap a JSON object literal into builder input.
    pub fn input(value: JsonValue) -> Input {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("fixture input must be a JSON object, got {other}"),
        }
    }
}

pub mod tracing_util {
    //! Opt-in log output for debugging a failing test: `RUST_LOG=hydrator=debug`.

    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn init() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }
}
