/// Device tag carried by every tensor.
///
/// Memory always lives on the host. The device decides how a kernel executes:
/// serially on the calling thread or split across the rayon pool. Both devices must
/// produce identical values, which is what the conformance suite checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Device {
    /// Serial execution on the calling thread.
    #[default]
    Cpu,
    /// Execution on the global rayon thread pool.
    Rayon,
}

impl Device {
    /// Returns the device type as a string.
    pub fn device_type(&self) -> &str {
        match self {
            Device::Cpu => "cpu",
            Device::Rayon => "rayon",
        }
    }

    /// Returns true if kernels on this device run in parallel.
    pub fn is_parallel(&self) -> bool {
        matches!(self, Device::Rayon)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.device_type())
    }
}

#[cfg(test)]
mod tests {
    use super::Device;

    #[test]
    fn device_default_is_cpu() {
        assert_eq!(Device::default(), Device::Cpu);
        assert!(!Device::Cpu.is_parallel());
        assert!(Device::Rayon.is_parallel());
        assert_eq!(Device::Rayon.to_string(), "rayon");
    }
}
