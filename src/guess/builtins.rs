//! Node.js core modules
//!
//! Bare imports of these names resolve to the runtime, never to npm.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Prefix that marks an import as a core module regardless of its name
pub const BUILTIN_PREFIX: &str = "node:";

const NODE_BUILTIN_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

static BUILTIN_MODULES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NODE_BUILTIN_MODULES.iter().copied().collect());

/// Check whether a top-level module name is provided by the runtime
pub fn is_builtin_module(name: &str) -> bool {
    BUILTIN_MODULES.contains(name)
}
