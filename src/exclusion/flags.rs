/// Protection capabilities suppressed by a process exclusion
///
/// Decoded from the integer flag stored in the fifth field of a process
/// exclusion entry. Only the low 8 bits are meaningful; higher bits and the
/// sign are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExclusionFlags {
    pub file_scan: bool,
    pub file_scan_children: bool,
    pub system_process_protection: bool,
    pub system_process_protection_children: bool,
    pub malicious_activity: bool,
    pub malicious_activity_children: bool,
    pub self_protection: bool,
    pub self_protection_children: bool,
}

impl ExclusionFlags {
    /// Decode an exclusion flag value
    ///
    /// Bit `n` (0..=7) maps to the n-th field in declaration order and is set
    /// iff `(flag >> n) & 1 == 1`.
    pub fn decode(flag: i32) -> Self {
        let bit = |n: u32| (flag >> n) & 1 == 1;
        Self {
            file_scan: bit(0),
            file_scan_children: bit(1),
            system_process_protection: bit(2),
            system_process_protection_children: bit(3),
            malicious_activity: bit(4),
            malicious_activity_children: bit(5),
            self_protection: bit(6),
            self_protection_children: bit(7),
        }
    }

    /// Flags in bit order, bit 0 first
    pub fn bits(&self) -> [bool; 8] {
        [
            self.file_scan,
            self.file_scan_children,
            self.system_process_protection,
            self.system_process_protection_children,
            self.malicious_activity,
            self.malicious_activity_children,
            self.self_protection,
            self.self_protection_children,
        ]
    }
}
