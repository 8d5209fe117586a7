use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::RwLock;

/// Process-wide context slots that an embedding host or an attached debugger
/// can inspect and overwrite while the process runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextInfo {
    pub info_1: Vec<String>,
    pub info_2: Vec<String>,
}

impl fmt::Display for ContextInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "info_1: {:?}, info_2: {:?}", self.info_1, self.info_2)
    }
}

static CONTEXT: RwLock<ContextInfo> = RwLock::new(ContextInfo {
    info_1: Vec::new(),
    info_2: Vec::new(),
});

/// Id of the current process.
pub fn pid() -> u32 {
    std::process::id()
}

/// Snapshot of the current context slots.
pub fn context_info() -> ContextInfo {
    CONTEXT.read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Replace the first context slot.
pub fn set_info_1(values: Vec<String>) {
    CONTEXT.write().unwrap_or_else(|e| e.into_inner()).info_1 = values;
}

/// Replace the second context slot.
pub fn set_info_2(values: Vec<String>) {
    CONTEXT.write().unwrap_or_else(|e| e.into_inner()).info_2 = values;
}

/// Replace both context slots at once.
pub fn set_context_info(info: ContextInfo) {
    *CONTEXT.write().unwrap_or_else(|e| e.into_inner()) = info;
}

/// Clear both context slots.
pub fn reset() {
    set_context_info(ContextInfo::default());
}

/// Block until the operator presses Enter.
///
/// The process id is printed first so a debugger can be attached
/// (e.g. gdb -p) before the run continues.
pub fn hold_for_attach() -> io::Result<()> {
    log::info!("pausing for attach, process id is {}", pid());
    eprint!("attach to pid {} and press Enter to continue... ", pid());
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
