//! # Error Tests
//!
//! Checks error messages and the initialization/runtime classification.

use std::io;
use std::path::PathBuf;

use ooosim_core::common::{Resource, SimError};
use pretty_assertions::assert_eq;

#[test]
fn test_initialization_classification() {
    let io_err = SimError::Io {
        path: PathBuf::from("missing.asm"),
        source: io::Error::new(io::ErrorKind::NotFound, "gone"),
    };
    assert!(io_err.is_initialization());
    assert!(
        SimError::Parse {
            line: 3,
            message: "bad".into()
        }
        .is_initialization()
    );
    assert!(SimError::InvalidConfig("x".into()).is_initialization());

    assert!(!SimError::Address { pc: 4000, address: -1 }.is_initialization());
    assert!(
        !SimError::ResourceExhausted {
            resource: Resource::Rob
        }
        .is_initialization()
    );
}

#[test]
fn test_messages() {
    assert_eq!(
        SimError::Decode {
            pc: 4004,
            opcode: "AND".into()
        }
        .to_string(),
        "unsupported opcode AND at pc 4004"
    );
    assert_eq!(
        SimError::RegisterOutOfRange { pc: 4000, reg: 16 }.to_string(),
        "register R16 out of range at pc 4000"
    );
    assert_eq!(
        SimError::ResourceExhausted {
            resource: Resource::Prf
        }
        .to_string(),
        "physical register file exhausted"
    );
    assert_eq!(
        SimError::Parse {
            line: 7,
            message: "unknown opcode 'FOO'".into()
        }
        .to_string(),
        "line 7: unknown opcode 'FOO'"
    );
}
