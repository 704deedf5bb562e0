use seqtrace_types::{SequenceMapping, Template};

fn mapping(from: &str, to: &str, message: &str) -> SequenceMapping {
    SequenceMapping {
        from: from.to_string(),
        to: to.to_string(),
        message: message.to_string(),
    }
}

fn template(name: &str, pattern: &str, map: SequenceMapping, priority: i64, desc: &str) -> Template {
    let mut t = Template::new(name, pattern, map, priority);
    t.description = desc.to_string();
    t
}

/// Built-in templates for automotive camera flows, used whenever no template
/// file is available or the supplied one cannot be read.
///
/// Patterns apply to the parsed message text, not the raw line.
pub fn default_templates() -> Vec<Template> {
    vec![
        template(
            "Camera Service Start",
            r"(?i)camera service start\w*",
            mapping("System", "CameraService", "Service Start"),
            1,
            "Camera service initialization",
        ),
        template(
            "Camera Open",
            r"(?i)camera open\w*",
            mapping("CameraApp", "CameraService", "Open Camera"),
            2,
            "Camera open request from an application",
        ),
        template(
            "Camera HAL Connection",
            r"(?i)hal\d?\s+(?:device\s+)?(?:open\w*|connect\w*)",
            mapping("CameraService", "CameraHAL", "HAL Connection"),
            3,
            "Camera HAL device connection",
        ),
        template(
            "Vehicle Gear Change",
            r"(?i)gear\s+\w*\s*chang\w*",
            mapping("VehicleHAL", "CameraApp", "Gear Change Event"),
            4,
            "Vehicle gear change event",
        ),
        template(
            "Camera Error",
            r"(?i)camera error\s*(.*)",
            mapping("CameraHAL", "CameraService", "Error Notification"),
            5,
            "Camera error handling",
        ),
    ]
}
