//! Build, mutate, encode and decode a message through its facade.
//!
//! Run with `RUST_LOG=protoface=trace` to see the codec events.

use protoface::Facade;
use tracing_subscriber::EnvFilter;

mod pb {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, prost::Enumeration)]
    #[repr(i32)]
    pub enum PhoneType {
        Mobile = 0,
        Home = 1,
        Work = 2,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Address {
        #[prost(string, tag = "1")]
        pub city: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Person {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(int32, optional, tag = "2")]
        pub age: Option<i32>,
        #[prost(enumeration = "PhoneType", tag = "3")]
        pub phone_type: i32,
        #[prost(message, optional, tag = "4")]
        pub address: Option<Address>,
        #[prost(string, repeated, tag = "5")]
        pub emails: Vec<String>,
        #[prost(oneof = "person::Contact", tags = "6, 7")]
        pub contact: Option<person::Contact>,
    }

    pub mod person {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum Contact {
            #[prost(string, tag = "6")]
            Phone(String),
            #[prost(bool, tag = "7")]
            DoNotContact(bool),
        }
    }
}

use pb::PhoneType;

#[protoface::message(storage = "pb::Address")]
pub struct Address {
    city: String,
}

#[protoface::message(storage = "pb::Person")]
pub struct Person {
    name: String,
    #[proto(optional)]
    age: Option<i32>,
    #[proto(enumeration)]
    phone_type: PhoneType,
    #[proto(message)]
    address: Address,
    #[proto(repeated)]
    emails: Vec<String>,
    #[proto(oneof = "contact", case = "pb::person::Contact::Phone")]
    phone: String,
    #[proto(oneof = "contact", case = "pb::person::Contact::DoNotContact")]
    do_not_contact: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let person = Person::new()
        .with_name("Ada")
        .with_phone_type(PhoneType::Work)
        .with_emails(["ada@example.com".to_string()])
        .with_phone("555-1234");
    println!("age before it is set: {:?}", person.age());

    // Writes through the sub-facade land in `person`.
    person.address().set_city("London");
    person.emails().push("ada@work.example".to_string());

    let bytes = person.serialize();
    println!("Encoded {} bytes: {:02x?}", bytes.len(), bytes);

    let decoded = match Person::parse(&bytes[..]) {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("failed to decode: {err}");
            return;
        }
    };
    println!("Decoded: {decoded:?}");

    match decoded.contact() {
        Some(pb::person::Contact::Phone(number)) => println!("call {number}"),
        Some(pb::person::Contact::DoNotContact(_)) => println!("do not contact"),
        None => println!("no contact preference"),
    }

    assert_eq!(person, decoded);
    assert_eq!(decoded.address().city(), "London");
    println!("Roundtrip successful!");
}
