//! The `simple.proto` test schema: prost storage types plus their facades.
//!
//! ```protobuf
//! enum TestEnum {
//!     UNSPECIFIED = 0;
//!     ONE = 1;
//!     TWO = 2;
//! }
//!
//! message Sibling {
//!     int64 field = 1;
//! }
//!
//! message Test {
//!     message Nested {
//!         int64 field = 1;
//!     }
//!
//!     int64 field = 1;
//!     optional int64 optional_field = 2;
//!     TestEnum enum_field = 3;
//!     oneof variant {
//!         int64 int_variant = 4;
//!         string string_variant = 5;
//!     }
//!     Sibling sibling = 6;
//!     Nested nested = 7;
//!     repeated int64 repeated_field = 8;
//! }
//! ```

#![allow(dead_code)]

/// Storage types, shaped the way `prost-build` emits them.
pub mod pb {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum TestEnum {
        Unspecified = 0,
        One = 1,
        Two = 2,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Sibling {
        #[prost(int64, tag = "1")]
        pub field: i64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Test {
        #[prost(int64, tag = "1")]
        pub field: i64,
        #[prost(int64, optional, tag = "2")]
        pub optional_field: Option<i64>,
        #[prost(enumeration = "TestEnum", tag = "3")]
        pub enum_field: i32,
        #[prost(message, optional, tag = "6")]
        pub sibling: Option<Sibling>,
        #[prost(message, optional, tag = "7")]
        pub nested: Option<test::Nested>,
        #[prost(int64, repeated, tag = "8")]
        pub repeated_field: Vec<i64>,
        #[prost(oneof = "test::Variant", tags = "4, 5")]
        pub variant: Option<test::Variant>,
    }

    pub mod test {
        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Nested {
            #[prost(int64, tag = "1")]
            pub field: i64,
        }

        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum Variant {
            #[prost(int64, tag = "4")]
            IntVariant(i64),
            #[prost(string, tag = "5")]
            StringVariant(String),
        }
    }
}

pub use pb::TestEnum;

#[protoface::message(storage = "pb::Sibling")]
pub struct Sibling {
    field: i64,
}

pub mod test {
    use super::pb;

    #[protoface::message(storage = "pb::test::Nested", name = "Test.Nested")]
    pub struct Nested {
        field: i64,
    }
}

#[protoface::message(storage = "pb::Test")]
pub struct Test {
    field: i64,
    #[proto(optional)]
    optional_field: Option<i64>,
    #[proto(enumeration)]
    enum_field: TestEnum,
    #[proto(oneof = "variant", case = "pb::test::Variant::IntVariant")]
    int_variant: i64,
    #[proto(oneof = "variant", case = "pb::test::Variant::StringVariant")]
    string_variant: String,
    #[proto(message)]
    sibling: Sibling,
    #[proto(message)]
    nested: test::Nested,
    #[proto(repeated)]
    repeated_field: Vec<i64>,
}
