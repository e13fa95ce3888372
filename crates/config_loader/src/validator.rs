//! 配置校验模块
//!
//! 校验规则：
//! - source.path 非空且扩展名可识别
//! - delay.default_seconds >= 1
//! - gateway channel 必须提供合法的 addr
//! - reporter name 非空且唯一
//! - json_lines reporter 必须提供 path

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{
    BroadcastBlueprint, ChannelType, ContractError, ReporterType, SourceFormat,
};

/// 校验 BroadcastBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    validate_source(blueprint)?;
    validate_delay(blueprint)?;
    validate_channel(blueprint)?;
    validate_reporters(blueprint)?;
    Ok(())
}

/// 校验数据源
fn validate_source(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    let path = &blueprint.source.path;
    if path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "source.path",
            "source path cannot be empty",
        ));
    }

    if SourceFormat::from_path(path).is_none() {
        return Err(ContractError::config_validation(
            "source.path",
            format!(
                "unsupported source format: {} (expected .xlsx/.xlsm/.xlsb/.xls/.ods/.json)",
                path.display()
            ),
        ));
    }

    if let Some(sheet) = &blueprint.source.sheet {
        if sheet.trim().is_empty() {
            return Err(ContractError::config_validation(
                "source.sheet",
                "sheet name cannot be blank",
            ));
        }
    }

    Ok(())
}

/// 校验发送间隔
fn validate_delay(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    if blueprint.delay.default_seconds < 1 {
        return Err(ContractError::config_validation(
            "delay.default_seconds",
            format!(
                "default_seconds must be >= 1, got {}",
                blueprint.delay.default_seconds
            ),
        ));
    }
    Ok(())
}

/// 校验 channel 配置
fn validate_channel(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    let channel = &blueprint.channel;
    if channel.channel_type == ChannelType::Gateway {
        let addr = channel.params.get("addr").ok_or_else(|| {
            ContractError::config_validation(
                "channel.params.addr",
                "gateway channel requires 'addr'",
            )
        })?;
        addr.parse::<SocketAddr>().map_err(|e| {
            ContractError::config_validation(
                "channel.params.addr",
                format!("invalid address '{addr}': {e}"),
            )
        })?;

        if let Some(timeout) = channel.params.get("connect_timeout_ms") {
            timeout.parse::<u64>().map_err(|e| {
                ContractError::config_validation(
                    "channel.params.connect_timeout_ms",
                    format!("invalid timeout '{timeout}': {e}"),
                )
            })?;
        }
    }
    Ok(())
}

/// 校验 reporter 配置
fn validate_reporters(blueprint: &BroadcastBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, reporter) in blueprint.reporters.iter().enumerate() {
        if reporter.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("reporters[{}].name", idx),
                "reporter name cannot be empty",
            ));
        }
        if !seen.insert(&reporter.name) {
            return Err(ContractError::config_validation(
                format!("reporters[name={}]", reporter.name),
                "duplicate reporter name",
            ));
        }
        if reporter.reporter_type == ReporterType::JsonLines
            && reporter.params.get("path").is_none_or(|p| p.is_empty())
        {
            return Err(ContractError::config_validation(
                format!("reporters[{}].params.path", reporter.name),
                "json_lines reporter requires 'path'",
            ));
        }
    }
    Ok(())
}
