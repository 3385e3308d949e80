#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::fmt;
    use std::time::Duration;

    use crate::{Bind, BoxError, DecodedValue, TextDecode, TypeShape};

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    pub struct Simple {
        #[bind(key = "field_a")]
        pub field_a: String,

        #[bind(key = "field_b")]
        pub field_b: String,
    }

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct Overrides {
        #[bind(key = "field_a", env = "custom_Name")]
        pub renamed: String,

        #[bind(key = "field_b")]
        pub plain: String,
    }

    #[derive(Bind, Debug, Default)]
    pub struct Unnamed {
        pub nameless: String,
    }

    #[derive(Bind, Debug, Default)]
    pub struct Skipping {
        #[bind(key = "hidden")]
        hidden: String,

        #[bind(key = "ignored", ignore)]
        pub ignored: String,

        #[bind(key = "shown")]
        pub shown: String,
    }

    impl Skipping {
        pub fn hidden(&self) -> &str {
            &self.hidden
        }
    }

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct Numbers {
        #[bind(key = "int")]
        pub int: i32,

        #[bind(key = "uint")]
        pub uint: u8,

        #[bind(key = "float")]
        pub float: f64,

        #[bind(key = "flag")]
        pub flag: bool,

        #[bind(key = "timeout")]
        pub timeout: Duration,
    }

    // -- Nested structs ---------------------------------------------------------

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    pub struct Outer {
        #[bind(key = "field_a")]
        pub field_a: String,

        #[bind(key = "field_b")]
        pub field_b: Middle,
    }

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    pub struct Middle {
        #[bind(key = "field_c")]
        pub field_c: String,

        #[bind(key = "field_d")]
        pub field_d: Inner,
    }

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    pub struct Inner {
        #[bind(key = "field_e")]
        pub field_e: String,
    }

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct OptionalInner {
        #[bind(key = "inner")]
        pub inner: Option<Inner>,

        #[bind(key = "deep")]
        pub deep: Option<Option<Middle>>,
    }

    // -- Pointer depth ----------------------------------------------------------

    pub type Deep15 = Option<
        Option<Option<Option<Option<Option<Option<Option<Option<Option<Option<Option<Option<Option<Option<u32>>>>>>>>>>>>>>,
    >;

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct Pointers {
        #[bind(key = "one")]
        pub one: Option<u32>,

        #[bind(key = "two")]
        pub two: Option<Option<u32>>,

        #[bind(key = "deep")]
        pub deep: Deep15,

        #[bind(key = "text")]
        pub text: Option<Option<Option<String>>>,
    }

    // -- Custom text decoders ---------------------------------------------------

    /// Keeps its salutation and takes the name from the text.
    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    #[bind(text)]
    pub struct Greeting {
        pub salutation: String,
        pub name: String,
    }

    impl TextDecode for Greeting {
        fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
            self.name = text.to_string();
            Ok(())
        }
    }

    impl fmt::Display for Greeting {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} {}", self.salutation, self.name)
        }
    }

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    #[bind(text)]
    pub struct Upper(pub String);

    impl TextDecode for Upper {
        fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
            self.0 = text.to_uppercase();
            Ok(())
        }
    }

    #[derive(Bind, Debug, Default, Clone, Copy, PartialEq)]
    #[bind(text)]
    pub struct Port(pub u16);

    impl TextDecode for Port {
        fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
            self.0 = text.parse()?;
            Ok(())
        }
    }

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct Custom {
        #[bind(key = "greeting")]
        pub greeting: Greeting,

        #[bind(key = "deep_greeting")]
        pub deep_greeting: Option<Option<Option<Greeting>>>,

        #[bind(key = "level")]
        pub level: Option<Upper>,

        #[bind(key = "port")]
        pub port: Port,
    }

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct CustomNested {
        #[bind(key = "inner")]
        pub inner: Custom,
    }

    // -- Collections ------------------------------------------------------------

    #[derive(Bind, Debug, Default, PartialEq)]
    pub struct Collections {
        #[bind(key = "ints")]
        pub ints: Vec<i64>,

        #[bind(key = "strings")]
        pub strings: Vec<String>,

        #[bind(key = "array")]
        pub array: [i32; 1],

        #[bind(key = "map")]
        pub map: HashMap<String, i64>,

        #[bind(key = "optional")]
        pub optional: Option<Vec<Option<String>>>,

        #[bind(key = "levels")]
        pub levels: Vec<Upper>,
    }

    // -- Unsupported types ------------------------------------------------------

    /// Complex number with a hand-written binding; it has no text form.
    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub struct Complex64 {
        pub re: f64,
        pub im: f64,
    }

    impl Bind for Complex64 {
        type Base = Self;
        const SHAPE: &'static TypeShape = &TypeShape::Complex(128);

        fn zero() -> Self {
            Self::default()
        }

        fn is_zero(&self) -> bool {
            *self == Self::default()
        }

        fn base_mut(&mut self) -> Option<&mut Self> {
            Some(self)
        }

        fn wrap(base: Self) -> Self {
            base
        }

        fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
            Err(format!("cannot convert {value:?} into a complex number").into())
        }
    }

    #[derive(Bind, Debug, Default)]
    pub struct WithComplex {
        #[bind(key = "complex")]
        pub complex: Complex64,
    }

    #[derive(Bind, Debug, Default)]
    pub struct WithStructs {
        #[bind(key = "items")]
        pub items: Vec<Inner>,
    }

    #[derive(Bind, Debug)]
    pub struct WithRawPointer {
        #[bind(key = "pointer")]
        pub pointer: *const u8,
    }

    #[test]
    fn derived_shapes() {
        assert_eq!(Outer::SHAPE, &TypeShape::Struct("Outer"));
        assert_eq!(Upper::SHAPE, &TypeShape::Text("Upper"));
        assert_eq!(
            <Option<Inner> as Bind>::SHAPE.to_string(),
            "Option<Inner>"
        );
    }

    #[test]
    fn derived_zero_values() {
        assert_eq!(Outer::zero(), Outer::default());
        assert!(Outer::zero().is_zero());
        let mut outer = Outer::zero();
        outer.field_b.field_d.field_e = "set".into();
        assert!(!outer.is_zero());
        assert!(WithRawPointer::zero().pointer.is_null());
    }

    #[test]
    fn derived_text_types() {
        assert!(Upper::zero().is_zero());
        assert_eq!(
            Upper::from_value(DecodedValue::Text("abc".into())).unwrap(),
            Upper("ABC".into())
        );
        assert!(Port::from_value(DecodedValue::Text("x".into())).is_err());
        assert!(Port::from_value(DecodedValue::Int(1)).is_err());
    }

    #[test]
    fn ignored_fields_do_not_affect_zero_checks() {
        let mut s = Skipping::zero();
        s.ignored = "anything".into();
        assert!(s.is_zero());
    }
}
