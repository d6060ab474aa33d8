use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::app_state::{HostInput, PrototypeLibrary};
use crate::engine::core::status::SceneStatus;
use crate::engine::mode::PlacementMode;
use crate::tools::animation::AnimationCommand;
use crate::tools::tool_manager::{CommandSource, OptionsCommand, OptionsCommandEvent};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Queue-based bridge between the options UI and the scene.
///
/// The host pushes raw JSON messages in with `push_message` and drains the
/// serialized replies and notifications with `take_outgoing`.
#[derive(Resource, Default)]
pub struct OptionsRpcInterface {
    incoming: Vec<String>,
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
    outbox: Vec<String>,
}

impl OptionsRpcInterface {
    /// Queue a raw JSON-RPC message from the options UI.
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.incoming.push(message.into());
    }

    /// Serialized messages ready for the options UI, oldest first.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    /// Send notification to the options UI without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin wiring the options RPC bridge around the scene's `Update` systems.
pub struct OptionsRpcPlugin;

impl Plugin for OptionsRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OptionsRpcInterface>()
            .init_resource::<PrototypeLibrary>()
            .init_resource::<SceneStatus>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<HostInput>()
            .add_systems(
                PreUpdate,
                (process_incoming_messages, handle_rpc_messages).chain(),
            )
            .add_systems(
                PostUpdate,
                (notify_status_changes, send_outgoing_messages).chain(),
            );
    }
}

/// Event representing an incoming RPC message from the options UI.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    mut rpc_interface: ResMut<OptionsRpcInterface>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    for content in std::mem::take(&mut rpc_interface.incoming) {
        message_events.write(IncomingRpcMessage { content });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    library: Res<PrototypeLibrary>,
    status: Res<SceneStatus>,
    mut rpc_interface: ResMut<OptionsRpcInterface>,
    mut command_events: EventWriter<HostInput>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) =
                    handle_rpc_request(&request, &library, &status, &mut command_events)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    None,
                    -32700,
                    "Parse error",
                    Some(serde_json::json!({ "reason": parse_error.to_string() })),
                ));
            }
        }
    }
}

/// Handle one request. Commands run whether or not the request carries an
/// id; only requests with an id get a response.
fn handle_rpc_request(
    request: &RpcRequest,
    library: &PrototypeLibrary,
    status: &SceneStatus,
    command_events: &mut EventWriter<HostInput>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_scene_status" => serde_json::to_value(status)
            .map_err(|e| RpcError::internal_error(&format!("Status serialisation failed: {}", e))),
        _ => match parse_command(&request.method, &request.params, library) {
            Some(Ok(command)) => {
                let acknowledgement = serde_json::json!({
                    "success": true,
                    "command": command.to_string()
                });
                info!("Options command dispatched: {:?}", command);
                command_events.write(HostInput::Options(OptionsCommandEvent {
                    command,
                    source: CommandSource::Rpc,
                }));
                Ok(acknowledgement)
            }
            Some(Err(error)) => Err(error),
            None => {
                warn!("Unknown RPC method: {}", request.method);
                let id = request.id.clone()?;
                return Some(create_error_response(
                    Some(id),
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                ));
            }
        },
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Map a method and its params to an options command. `None` for methods
/// that are not commands.
pub fn parse_command(
    method: &str,
    params: &serde_json::Value,
    library: &PrototypeLibrary,
) -> Option<Result<OptionsCommand, RpcError>> {
    let command = match method {
        "select_prototype" => parse_select_prototype(params, library),
        "clear_selection" => Ok(OptionsCommand::ClearSelection),
        "toggle_plane_overlay" => Ok(OptionsCommand::TogglePlaneOverlay),
        "undo_last_object" => Ok(OptionsCommand::UndoLastObject),
        "reset_scene" => Ok(OptionsCommand::ResetScene),
        "set_placement_mode" => parse_placement_mode(params),
        "animation_control" => parse_animation_control(params),
        _ => return None,
    };
    Some(command)
}

fn parse_select_prototype(
    params: &serde_json::Value,
    library: &PrototypeLibrary,
) -> Result<OptionsCommand, RpcError> {
    #[derive(Deserialize)]
    struct SelectPrototypeParams {
        name: String,
    }

    let parsed = serde_json::from_value::<SelectPrototypeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' parameter"))?;

    if library.get(&parsed.name).is_none() {
        return Err(RpcError::invalid_params(&format!(
            "Unknown prototype: {}",
            parsed.name
        )));
    }
    Ok(OptionsCommand::SelectPrototype(parsed.name))
}

fn parse_placement_mode(params: &serde_json::Value) -> Result<OptionsCommand, RpcError> {
    #[derive(Deserialize)]
    struct PlacementModeParams {
        mode: String,
    }

    let parsed = serde_json::from_value::<PlacementModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;

    let mode = PlacementMode::from_string(&parsed.mode)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown mode: {}", parsed.mode)))?;
    Ok(OptionsCommand::SetMode(mode))
}

fn parse_animation_control(params: &serde_json::Value) -> Result<OptionsCommand, RpcError> {
    #[derive(Deserialize)]
    struct AnimationControlParams {
        segment: u8,
    }

    let parsed = serde_json::from_value::<AnimationControlParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'segment' parameter"))?;

    let command = AnimationCommand::from_segment(parsed.segment).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown animation segment: {}", parsed.segment))
    })?;
    Ok(OptionsCommand::Animation(command))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: Option<serde_json::Value>,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id,
    }
}

/// Push the new status to the options UI whenever it changes.
fn notify_status_changes(status: Res<SceneStatus>, mut rpc_interface: ResMut<OptionsRpcInterface>) {
    if !status.is_changed() {
        return;
    }
    match serde_json::to_value(&*status) {
        Ok(params) => rpc_interface.send_notification("scene_status_changed", params),
        Err(e) => error!("Failed to serialize scene status: {}", e),
    }
}

/// Serialize queued notifications and responses into the outbox.
fn send_outgoing_messages(mut rpc_interface: ResMut<OptionsRpcInterface>) {
    let interface = &mut *rpc_interface;

    // Notifications first.
    for notification in interface.outgoing_notifications.drain(..) {
        push_serialized(&mut interface.outbox, &notification);
    }

    // Responses second to maintain order.
    for response in interface.outgoing_responses.drain(..) {
        push_serialized(&mut interface.outbox, &response);
    }
}

fn push_serialized<T: Serialize>(outbox: &mut Vec<String>, message: &T) {
    match serde_json::to_string(message) {
        Ok(json) => outbox.push(json),
        Err(e) => error!("Failed to serialize message: {}", e),
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::engine::scene::{Prototype, SharedGeometry};

    fn library() -> PrototypeLibrary {
        let mut library = PrototypeLibrary::default();
        library.insert(Prototype::new(
            "lamp",
            SharedGeometry {
                mesh: "lamp.mesh".into(),
                material: "brass".into(),
            },
        ));
        library
    }

    #[test]
    fn known_prototype_is_selected() {
        let command = parse_command("select_prototype", &json!({"name": "lamp"}), &library());
        assert_eq!(command, Some(Ok(OptionsCommand::SelectPrototype("lamp".into()))));
    }

    #[test]
    fn unknown_prototype_is_invalid_params() {
        let command = parse_command("select_prototype", &json!({"name": "sofa"}), &library());
        assert!(matches!(command, Some(Err(RpcError { code: -32602, .. }))));

        let command = parse_command("select_prototype", &json!({}), &library());
        assert!(matches!(command, Some(Err(RpcError { code: -32602, .. }))));
    }

    #[test]
    fn mode_and_segment_are_validated() {
        assert_eq!(
            parse_command("set_placement_mode", &json!({"mode": "plane"}), &library()),
            Some(Ok(OptionsCommand::SetMode(PlacementMode::PlaneSnap)))
        );
        assert!(matches!(
            parse_command("set_placement_mode", &json!({"mode": "sketch"}), &library()),
            Some(Err(_))
        ));
        assert_eq!(
            parse_command("animation_control", &json!({"segment": 1}), &library()),
            Some(Ok(OptionsCommand::Animation(AnimationCommand::Resume)))
        );
        assert!(matches!(
            parse_command("animation_control", &json!({"segment": 7}), &library()),
            Some(Err(_))
        ));
    }

    #[test]
    fn parameterless_commands_ignore_params() {
        assert_eq!(
            parse_command("undo_last_object", &serde_json::Value::Null, &library()),
            Some(Ok(OptionsCommand::UndoLastObject))
        );
        assert_eq!(
            parse_command("reset_scene", &json!({"extra": true}), &library()),
            Some(Ok(OptionsCommand::ResetScene))
        );
    }

    #[test]
    fn non_command_methods_are_not_parsed() {
        assert_eq!(parse_command("get_scene_status", &json!({}), &library()), None);
        assert_eq!(parse_command("get_fps", &json!({}), &library()), None);
    }

    #[test]
    fn request_without_params_field_parses() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"undo_last_object","id":1}"#).unwrap();
        assert_eq!(request.params, serde_json::Value::Null);
        assert_eq!(request.id, Some(json!(1)));
    }
}
