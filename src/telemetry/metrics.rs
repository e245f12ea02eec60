use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("vision-report-generator"));

// --- Report Pipeline Metrics ---

pub static REPORT_GENERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.generation.duration")
        .with_description("Total report generation duration in seconds")
        .with_unit("s")
        .build()
});

pub static REPORTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.generation.total")
        .with_description("Report generations by outcome")
        .with_unit("{report}")
        .build()
});

pub static STAGE_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.stage.duration")
        .with_description("Duration of each pipeline stage in seconds")
        .with_unit("s")
        .build()
});

pub static IMAGES_UPLOADED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.images.uploaded")
        .with_description("Number of images uploaded to the assistant file store")
        .with_unit("{image}")
        .build()
});

pub static IMAGE_UPLOAD_FAILURES: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.images.failed")
        .with_description("Number of images that failed to decode or upload")
        .with_unit("{image}")
        .build()
});

pub static RUN_POLL_ATTEMPTS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.run.poll_attempts")
        .with_description("Number of assistant run status queries")
        .with_unit("{query}")
        .build()
});

// --- HTTP Metrics ---

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0, 30000.0, 60000.0, 120000.0,
            300000.0,
        ])
        .build()
});
