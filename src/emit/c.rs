//! C emitter for the simple CBOR RPC runtime.
//!
//! The header declares one handler per method plus the lookup entry points the
//! runtime links against (`rpc_lookup_index_by_key`, `rpc_lookup_key_by_index`,
//! `rpc_get_key_count`). The source holds the salts, displacement array, keys in
//! slot order, and the `rpc_functions` table indexed by slot.

use std::fmt::Write;

use super::{Artifact, Emitter};
use crate::core::config::OutputConfig;
use crate::core::error::Result;
use crate::dispatch::{DispatchEntry, DispatchTable};

/// Header of the C runtime the generated files include
pub const RUNTIME_HEADER: &str = "simplecborrpc.h";

/// Handler arguments shared by every generated prototype
const HANDLER_ARGS: &str =
    "const CborValue *args_iterator, CborEncoder *result, const char **error_msg, void *user_ptr";

/// Renders `rpc_api.c` and `rpc_api.h`.
#[derive(Debug, Clone)]
pub struct CEmitter {
    /// Generated source file name
    pub source_name: String,
    /// Generated header file name
    pub header_name: String,
}

impl Default for CEmitter {
    fn default() -> Self {
        Self::from(&OutputConfig::default())
    }
}

impl From<&OutputConfig> for CEmitter {
    fn from(cfg: &OutputConfig) -> Self {
        Self {
            source_name: cfg.source_name.clone(),
            header_name: cfg.header_name.clone(),
        }
    }
}

impl Emitter for CEmitter {
    fn render(&self, table: &DispatchTable) -> Result<Vec<Artifact>> {
        Ok(vec![
            Artifact::new(self.header_name.as_str(), self.render_header(table)?),
            Artifact::new(self.source_name.as_str(), self.render_source(table)?),
        ])
    }
}

impl CEmitter {
    fn render_header(&self, table: &DispatchTable) -> Result<String> {
        let guard = include_guard(&self.header_name);
        let mut out = String::new();

        banner(&mut out, table)?;
        writeln!(out, "#ifndef {}", guard)?;
        writeln!(out, "#define {}", guard)?;
        writeln!(out)?;
        writeln!(out, "#include <stddef.h>")?;
        writeln!(out, "#include \"{}\"", RUNTIME_HEADER)?;
        writeln!(out)?;
        writeln!(out, "#define RPC_FUNCTION_COUNT {}", table.len())?;
        writeln!(out, "#define RPC_MAX_KEY_LENGTH {}", crate::types::MAX_KEY_LEN)?;
        writeln!(out)?;

        writeln!(out, "typedef enum {{")?;
        for entry in table.entries() {
            writeln!(out, "    {} = {},", handle_name(entry.name()), entry.slot)?;
        }
        writeln!(out)?;
        writeln!(out, "    NUM_FUNCTION_HANDLES = {}", table.len())?;
        writeln!(out, "}} rpc_function_handle_t;")?;
        writeln!(out)?;

        for entry in table.entries() {
            writeln!(out, "rpc_error_t rpc_{}({});", entry.name(), HANDLER_ARGS)?;
        }
        writeln!(out)?;

        writeln!(out, "int rpc_lookup_index_by_key(const char *key);")?;
        writeln!(out, "const char *rpc_lookup_key_by_index(size_t index);")?;
        writeln!(out, "size_t rpc_get_key_count(void);")?;
        writeln!(out)?;
        writeln!(out, "extern const rpc_function_entry_t rpc_functions[RPC_FUNCTION_COUNT];")?;
        writeln!(out)?;
        writeln!(out, "#endif //{}", guard)?;

        Ok(out)
    }

    fn render_source(&self, table: &DispatchTable) -> Result<String> {
        let params = table.params();
        let mut out = String::new();

        banner(&mut out, table)?;
        writeln!(out, "#include <stdint.h>")?;
        writeln!(out, "#include <string.h>")?;
        writeln!(out, "#include \"{}\"", self.header_name)?;
        writeln!(out)?;
        writeln!(out, "#define RPC_SALT_LENGTH {}", crate::mph::SALT_LEN)?;
        writeln!(out, "#define RPC_BUCKET_COUNT {}", params.bucket_count())?;
        writeln!(out)?;

        let salt1 = join(params.salt1.as_bytes().iter().map(|b| format!("0x{:02X}", b)));
        let salt2 = join(params.salt2.as_bytes().iter().map(|b| format!("0x{:02X}", b)));
        let graph = join(params.displacements.iter().map(|d| d.to_string()));
        let keys = join(table.entries().iter().map(|e| format!("\"{}\"", e.name())));

        writeln!(out, "static const uint8_t rpc_salt1[RPC_SALT_LENGTH] = {{{}}};", salt1)?;
        writeln!(out, "static const uint8_t rpc_salt2[RPC_SALT_LENGTH] = {{{}}};", salt2)?;
        writeln!(out, "static const uint32_t rpc_graph[RPC_BUCKET_COUNT] = {{{}}};", graph)?;
        writeln!(out, "static const char *const rpc_keys[RPC_FUNCTION_COUNT] = {{{}}};", keys)?;
        writeln!(out)?;

        out.push_str(HASH_FN);
        writeln!(out)?;
        out.push_str(LOOKUP_FNS);
        writeln!(out)?;

        writeln!(out, "const rpc_function_entry_t rpc_functions[RPC_FUNCTION_COUNT] = {{")?;
        for entry in table.entries() {
            writeln!(out, "    {},", function_entry(entry))?;
        }
        writeln!(out, "}};")?;

        Ok(out)
    }
}

const HASH_FN: &str = r#"static uint64_t rpc_hash(const char *key, const uint8_t *salt) {
    uint64_t z = 0;
    for (size_t i = 0; i < RPC_SALT_LENGTH && key[i] != '\0'; i++) {
        z += (uint64_t)salt[i] * (uint8_t)key[i];
    }

    z += 0x9E3779B97F4A7C15ULL;
    z = (z ^ (z >> 30)) * 0xBF58476D1CE4E5B9ULL;
    z = (z ^ (z >> 27)) * 0x94D049BB133111EBULL;
    return z ^ (z >> 31);
}
"#;

const LOOKUP_FNS: &str = r#"int rpc_lookup_index_by_key(const char *key) {
    if (key == NULL) return -1;

    uint64_t bucket = rpc_hash(key, rpc_salt1) % RPC_BUCKET_COUNT;
    uint64_t slot = (rpc_hash(key, rpc_salt2) % RPC_FUNCTION_COUNT + rpc_graph[bucket]) % RPC_FUNCTION_COUNT;

    // the hash is only perfect over known keys
    if (strcmp(rpc_keys[slot], key) != 0) return -1;

    return (int)slot;
}

const char *rpc_lookup_key_by_index(size_t index) {
    if (index >= RPC_FUNCTION_COUNT) return NULL;

    return rpc_keys[index];
}

size_t rpc_get_key_count(void) {
    return RPC_FUNCTION_COUNT;
}
"#;

fn banner(out: &mut String, table: &DispatchTable) -> std::fmt::Result {
    writeln!(out, "/* SPDX-License-Identifier: MIT */")?;
    writeln!(
        out,
        "/* Generated by {} {} (seed {}). Do not edit. */",
        crate::NAME,
        crate::VERSION,
        table.params().seed
    )?;
    writeln!(out)
}

fn function_entry(entry: &DispatchEntry) -> String {
    let args = join(entry.params().iter().map(|p| p.c_name()));
    format!("{{\"{}\", rpc_{}, RPC_ARGS({})}}", entry.name(), entry.name(), args)
}

fn join<I: Iterator<Item = String>>(items: I) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn handle_name(name: &str) -> String {
    format!("RPC_FUNCTION_{}", name.to_ascii_uppercase())
}

fn include_guard(header_name: &str) -> String {
    header_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MethodEntry;
    use crate::keyset::KeySet;
    use crate::mph::{construct, MphConfig};

    fn entry(name: &str, params: &[&str]) -> MethodEntry {
        MethodEntry {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn table(methods: &[MethodEntry]) -> DispatchTable {
        let keyset = KeySet::with_system_methods(methods).unwrap();
        let cfg = MphConfig { seed: Some(2024), ..Default::default() };
        let construction = construct(&keyset.names(), &cfg).unwrap();
        DispatchTable::assemble(&keyset, construction).unwrap()
    }

    fn sample() -> DispatchTable {
        table(&[
            entry("echo", &["TEXT_STRING"]),
            entry("always_error", &[]),
            entry("sum_array", &["ARRAY"]),
            entry("_hidden_ping", &[]),
        ])
    }

    #[test]
    fn test_renders_header_then_source() {
        let artifacts = CEmitter::default().render(&sample()).unwrap();
        let names: Vec<&str> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["rpc_api.h", "rpc_api.c"]);
        assert!(artifacts.iter().all(|a| a.contents.ends_with('\n')));
    }

    #[test]
    fn test_header_declares_handlers_and_lookups() {
        let t = sample();
        let artifacts = CEmitter::default().render(&t).unwrap();
        let header = &artifacts[0].contents;

        assert!(header.contains("#ifndef RPC_API_H"));
        assert!(header.contains("#define RPC_FUNCTION_COUNT 7"));
        assert!(header.contains("int rpc_lookup_index_by_key(const char *key);"));
        assert!(header.contains(&format!("rpc_error_t rpc___ping({});", HANDLER_ARGS)));

        let echo = t.lookup("echo").unwrap();
        assert!(header.contains(&format!("RPC_FUNCTION_ECHO = {},", echo.slot)));
    }

    #[test]
    fn test_source_lists_keys_in_slot_order() {
        let t = sample();
        let artifacts = CEmitter::default().render(&t).unwrap();
        let source = &artifacts[1].contents;

        let keys = t
            .entries()
            .iter()
            .map(|e| format!("\"{}\"", e.name()))
            .collect::<Vec<_>>()
            .join(", ");
        assert!(source.contains(&format!("rpc_keys[RPC_FUNCTION_COUNT] = {{{}}};", keys)));

        let graph = t
            .params()
            .displacements
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        assert!(source.contains(&format!("rpc_graph[RPC_BUCKET_COUNT] = {{{}}};", graph)));
        assert!(source.contains(&format!("0x{:02X}", t.params().salt1.as_bytes()[0])));
    }

    #[test]
    fn test_function_table_carries_argument_types() {
        let t = sample();
        let source = &CEmitter::default().render(&t).unwrap()[1].contents;

        assert!(source.contains("{\"echo\", rpc_echo, RPC_ARGS(CBOR_TYPE_TEXT_STRING)},"));
        assert!(source.contains("{\"always_error\", rpc_always_error, RPC_ARGS()},"));
        assert!(source.contains("{\"sum_array\", rpc_sum_array, RPC_ARGS(CBOR_TYPE_ARRAY)},"));

        // table rows follow slot order
        let rows: Vec<usize> = t
            .entries()
            .iter()
            .map(|e| source.find(&format!("{{\"{}\", rpc_", e.name())).unwrap())
            .collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_handle_names_are_uppercased() {
        assert_eq!(handle_name("sum_array"), "RPC_FUNCTION_SUM_ARRAY");
        assert_eq!(handle_name("__ping"), "RPC_FUNCTION___PING");
    }

    #[test]
    fn test_include_guard_from_file_name() {
        assert_eq!(include_guard("rpc_api.h"), "RPC_API_H");
        assert_eq!(include_guard("my-api.h"), "MY_API_H");
    }
}
