//! 配置校验模块
//!
//! 校验规则：
//! - 每个传感器 interval_ms > 0
//! - aligner.bucket_width > 0
//! - 输出目录与文件名前缀非空
//! - 文件扩展名不含分隔符

use contracts::{ContractError, RecorderBlueprint, SensorKind};

/// 校验 RecorderBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RecorderBlueprint) -> Result<(), ContractError> {
    validate_sensor_intervals(blueprint)?;
    validate_aligner(blueprint)?;
    validate_output(blueprint)?;
    Ok(())
}

/// 校验传感器采样间隔
fn validate_sensor_intervals(blueprint: &RecorderBlueprint) -> Result<(), ContractError> {
    for kind in SensorKind::ALL {
        let sensor = blueprint.sensors.get(kind);
        if sensor.interval_ms == 0 {
            return Err(ContractError::config_validation(
                format!("sensors.{kind}.interval_ms"),
                "interval_ms must be > 0",
            ));
        }
    }
    Ok(())
}

/// 校验对齐参数
fn validate_aligner(blueprint: &RecorderBlueprint) -> Result<(), ContractError> {
    if blueprint.aligner.bucket_width == 0 {
        return Err(ContractError::config_validation(
            "aligner.bucket_width",
            "bucket_width must be > 0",
        ));
    }
    Ok(())
}

/// 校验输出配置
fn validate_output(blueprint: &RecorderBlueprint) -> Result<(), ContractError> {
    let output = &blueprint.output;

    if output.directory.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "output.directory",
            "output directory cannot be empty",
        ));
    }

    if output.file_prefix.is_empty() {
        return Err(ContractError::config_validation(
            "output.file_prefix",
            "file prefix cannot be empty",
        ));
    }

    if output.file_prefix.contains(['/', '\\']) {
        return Err(ContractError::config_validation(
            "output.file_prefix",
            format!("file prefix '{}' must not contain path separators", output.file_prefix),
        ));
    }

    if output.file_extension.is_empty() || output.file_extension.contains(['.', '/', '\\']) {
        return Err(ContractError::config_validation(
            "output.file_extension",
            format!(
                "file extension '{}' must be non-empty and contain no '.' or separators",
                output.file_extension
            ),
        ));
    }

    Ok(())
}
