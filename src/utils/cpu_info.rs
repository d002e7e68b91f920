//! CPU identification and frequency sampling.
//!
//! Only used to label and cross-check reports; the per-operation figures never
//! depend on anything here.

use std::fs;

use crate::error::{BenchError, Result};

/// Human-readable CPU model, or `"unknown"`.
pub fn cpu_model() -> String {
    fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|text| model_from_cpuinfo(&text))
        .or_else(brand_string)
        .unwrap_or_else(|| "unknown".to_string())
}

/// First `model name` entry of a `/proc/cpuinfo` dump.
pub fn model_from_cpuinfo(text: &str) -> Option<String> {
    text.lines()
        .filter(|l| l.starts_with("model name") || l.starts_with("Model"))
        .filter_map(|l| l.split_once(':'))
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Processor brand string from CPUID leaves 0x8000_0002..=0x8000_0004.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn brand_string() -> Option<String> {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::__cpuid;
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::__cpuid;

    // SAFETY: CPUID is available on every CPU this crate targets.
    #[allow(unused_unsafe)]
    let max_leaf = unsafe { __cpuid(0x8000_0000) }.eax;
    if max_leaf < 0x8000_0004 {
        return None;
    }

    let mut bytes = Vec::with_capacity(48);
    for leaf in 0x8000_0002u32..=0x8000_0004 {
        #[allow(unused_unsafe)]
        let r = unsafe { __cpuid(leaf) };
        for reg in [r.eax, r.ebx, r.ecx, r.edx] {
            bytes.extend_from_slice(&reg.to_le_bytes());
        }
    }

    let brand = String::from_utf8_lossy(&bytes)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();
    (!brand.is_empty()).then_some(brand)
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn brand_string() -> Option<String> {
    None
}

/// Current frequency of `cpu` as reported by the cpufreq driver, in MHz.
pub fn sample_frequency_mhz(cpu: usize) -> Result<f64> {
    let path = format!("/sys/devices/system/cpu/cpu{}/cpufreq/scaling_cur_freq", cpu);
    let text = fs::read_to_string(&path)
        .map_err(|e| BenchError::EnvironmentFailure(format!("{}: {}", path, e)))?;
    parse_khz(&text)
        .map(|khz| khz / 1000.0)
        .ok_or_else(|| {
            BenchError::EnvironmentFailure(format!(
                "{}: unexpected content {:?}",
                path,
                text.trim()
            ))
        })
}

fn parse_khz(text: &str) -> Option<f64> {
    text.trim().parse::<u64>().ok().map(|khz| khz as f64)
}
