// Wire-format tests: field casing, enum tags, omitted composite fields.

use metricsd::models::{
    CpuMetrics, MemorySource, MetaMetrics, ProcessEntry, SortKey, SystemStatus,
};

fn sample_process() -> ProcessEntry {
    ProcessEntry {
        pid: 101,
        ppid: 1,
        username: "mock".to_string(),
        command: "alpha".to_string(),
        full_command: "/usr/bin/alpha".to_string(),
        cpu_percent: 12.5,
        cpu_time_secs: 3.25,
        memory_kb: 15_000,
        memory_percent: 0.1,
        memory_calculation: MemorySource::PssDirty,
        rss_kb: 30_720,
        rss_percent: 0.2,
        pss_kb: 18_000,
        pss_percent: 0.12,
    }
}

#[test]
fn test_process_entry_uses_camel_case() {
    let json = serde_json::to_string(&sample_process()).expect("serialize");
    assert!(json.contains("\"fullCommand\""));
    assert!(json.contains("\"cpuPercent\""));
    assert!(json.contains("\"cpuTimeSecs\""));
    assert!(json.contains("\"memoryKb\""));
    assert!(json.contains("\"rssPercent\""));
    assert!(!json.contains("full_command"));
}

#[test]
fn test_memory_calculation_tag_is_snake_case() {
    let json = serde_json::to_string(&sample_process()).expect("serialize");
    assert!(json.contains("\"memoryCalculation\":\"pss_dirty\""));

    let mut entry = sample_process();
    entry.memory_calculation = MemorySource::Rss;
    let json = serde_json::to_string(&entry).expect("serialize");
    assert!(json.contains("\"memoryCalculation\":\"rss\""));
}

#[test]
fn test_cpu_metrics_field_names() {
    let cpu = CpuMetrics {
        count: 8,
        model: "m".to_string(),
        frequency_mhz: 3000.0,
        temperature: 42.0,
        usage_percent: 42.5,
        core_usage: vec![42.5],
        total: vec![0.0; 8],
        cores: vec![vec![0.0; 8]],
        cursor: "abc".to_string(),
    };
    let json = serde_json::to_string(&cpu).expect("serialize");
    assert!(json.contains("\"usagePercent\""));
    assert!(json.contains("\"coreUsage\""));
    assert!(json.contains("\"frequencyMhz\""));
    assert!(json.contains("\"cursor\":\"abc\""));
}

#[test]
fn test_meta_omits_absent_modules() {
    let meta = MetaMetrics {
        system: Some(SystemStatus {
            load_avg: [0.1, 0.2, 0.3],
            process_count: 10,
            thread_count: 40,
            boot_time_secs: 1_700_000_000,
            uptime_secs: 3_600,
        }),
        ..Default::default()
    };
    let json = serde_json::to_string(&meta).expect("serialize");
    assert!(json.contains("\"system\""));
    assert!(json.contains("\"loadAvg\""));
    assert!(!json.contains("\"cpu\""));
    assert!(!json.contains("\"network\""));
    assert!(!json.contains("null"));
}

#[test]
fn test_sort_key_deserializes_lowercase() {
    let key: SortKey = serde_json::from_str("\"memory\"").expect("sort key");
    assert_eq!(key, SortKey::Memory);
    let key: SortKey = serde_json::from_str("\"pid\"").expect("sort key");
    assert_eq!(key, SortKey::Pid);
    assert!(serde_json::from_str::<SortKey>("\"CPU\"").is_err());
}

#[test]
fn test_sort_key_default_is_cpu() {
    assert_eq!(SortKey::default(), SortKey::Cpu);
}
