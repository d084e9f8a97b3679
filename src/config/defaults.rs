//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

pub mod site {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "public".into()
    }
}

pub mod deploy {
    use std::path::PathBuf;

    pub fn provider() -> String {
        "github".into()
    }

    pub fn workdir() -> PathBuf {
        ".deploy".into()
    }

    pub mod github {
        pub fn repository() -> String {
            String::new()
        }
    }

    pub mod git {
        pub fn remote() -> String {
            String::new()
        }

        pub fn branch() -> String {
            "master".into()
        }
    }
}
