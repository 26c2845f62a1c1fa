use site_core::{AppViewModel, NotificationKind, NotificationView, OverlayView, ScreenView};

/// Renders the view model as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(overlay) = &view.overlay {
        // The overlay covers everything else.
        lines.extend(render_overlay(overlay));
        return lines;
    }

    match &view.screen {
        ScreenView::Home => {
            let label = if view.content_revealed {
                "Inicio"
            } else {
                "Inicio (contenido oculto)"
            };
            lines.push(format!("== {label} =="));
        }
        ScreenView::RequestForm {
            email,
            submit_enabled,
        } => {
            lines.push("== Recuperar contraseña ==".to_string());
            lines.push(format!("Correo: {email}"));
            lines.push(button("Enviar instrucciones", *submit_enabled));
        }
        ScreenView::RequestSent { text } => {
            lines.push("== Recuperar contraseña ==".to_string());
            lines.push(text.clone());
        }
        ScreenView::InvalidLink { text } => {
            lines.push("== Nueva contraseña ==".to_string());
            lines.push(text.clone());
        }
        ScreenView::ConfirmForm {
            password_filled,
            confirmation_filled,
            submit_enabled,
        } => {
            lines.push("== Nueva contraseña ==".to_string());
            lines.push(format!("Contraseña: {}", masked(*password_filled)));
            lines.push(format!("Confirmar: {}", masked(*confirmation_filled)));
            lines.push(button("Guardar", *submit_enabled));
        }
        ScreenView::ConfirmDone {
            text,
            sign_in_route,
        } => {
            lines.push("== Nueva contraseña ==".to_string());
            lines.push(text.clone());
            lines.push(format!("Iniciar sesión -> {sign_in_route}"));
        }
    }

    if let Some(notification) = &view.notification {
        lines.push(render_notification(notification));
    }
    lines
}

fn render_overlay(overlay: &OverlayView) -> Vec<String> {
    vec![
        format!("## {} ##", overlay.text),
        format!("   (video de fondo: {})", overlay.background_video),
    ]
}

fn render_notification(notification: &NotificationView) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "OK",
        NotificationKind::Error => "ERROR",
    };
    let close = if notification.closable { " [x]" } else { "" };
    format!("[{tag}] {}{close}", notification.text)
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[ {label} ]")
    } else {
        format!("[ {label} ... ]")
    }
}

fn masked(filled: bool) -> &'static str {
    if filled {
        "********"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_hides_the_screen() {
        let view = AppViewModel {
            screen: ScreenView::RequestSent {
                text: "hecho".to_string(),
            },
            overlay: Some(OverlayView {
                text: "Casi listo...".to_string(),
                background_video: "/v.mp4".to_string(),
                video_looping: true,
                video_muted: true,
                viewport_portal: true,
            }),
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "## Casi listo... ##");
        assert!(lines.iter().all(|line| !line.contains("hecho")));
    }

    #[test]
    fn notification_follows_the_screen() {
        let view = AppViewModel {
            screen: ScreenView::ConfirmForm {
                password_filled: true,
                confirmation_filled: false,
                submit_enabled: false,
            },
            notification: Some(NotificationView {
                kind: NotificationKind::Error,
                text: "Las contraseñas no coinciden.".to_string(),
                closable: true,
            }),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view),
            vec![
                "== Nueva contraseña ==".to_string(),
                "Contraseña: ********".to_string(),
                "Confirmar: ".to_string(),
                "[ Guardar ... ]".to_string(),
                "[ERROR] Las contraseñas no coinciden. [x]".to_string(),
            ]
        );
    }
}
