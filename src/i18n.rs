//! English and Turkish message catalogs.
//!
//! Templates receive the whole catalog as `t` and look messages up by key.
//! Status, result, role and input type codes double as keys, so values coming
//! from the backend can be rendered with `t[code]`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::preferences::Language;

pub type Catalog = HashMap<&'static str, &'static str>;

const EN: &[(&str, &str)] = &[
    ("app_name", "Saphire QC"),
    // navigation
    ("nav_dashboard", "Dashboard"),
    ("nav_companies", "Companies"),
    ("nav_locations", "Locations"),
    ("nav_machines", "Machines"),
    ("nav_products", "Products"),
    ("nav_templates", "QC templates"),
    ("nav_records", "QC records"),
    ("nav_approvals", "Approvals"),
    ("nav_users", "Users"),
    ("nav_logs", "System logs"),
    ("nav_operator", "Operator"),
    ("nav_history", "My records"),
    ("nav_settings", "Settings"),
    ("toggle_sidebar", "Toggle sidebar"),
    ("toggle_theme", "Toggle theme"),
    ("logout", "Sign out"),
    // auth
    ("login_title", "Sign in"),
    ("login_subtitle", "Quality control console"),
    ("login_submit", "Sign in"),
    ("login_invalid_credentials", "Wrong username or password."),
    ("session_expired", "Your session has expired. Please sign in again."),
    ("not_allowed_title", "Access denied"),
    ("not_enough_rights", "You are not allowed to open this page."),
    ("back_home", "Go to start page"),
    // generic
    ("add", "Add"),
    ("edit", "Edit"),
    ("delete", "Delete"),
    ("save", "Save"),
    ("remove", "Remove"),
    ("back", "Back"),
    ("retry", "Retry"),
    ("search", "Search…"),
    ("yes", "Yes"),
    ("no", "No"),
    ("active", "Active"),
    ("inactive", "Inactive"),
    ("name", "Name"),
    ("code", "Code"),
    ("description", "Description"),
    ("logo", "Logo URL"),
    ("address", "Address"),
    ("company", "Company"),
    ("location", "Location"),
    ("machine", "Machine"),
    ("product", "Product"),
    ("username", "Username"),
    ("password", "Password"),
    ("email", "E-mail"),
    ("full_name", "Full name"),
    ("role", "Role"),
    ("total", "Total"),
    ("no_data", "Nothing to show yet."),
    ("no_results", "No matches for this search."),
    ("confirm_delete", "Delete this entry? This cannot be undone."),
    ("saved", "Saved."),
    ("deleted", "Deleted."),
    ("not_found", "The requested item no longer exists."),
    ("error_title", "Something went wrong"),
    ("error_occurred", "An error occurred. Please try again."),
    ("backend_unreachable", "The QC server cannot be reached. Check the connection and try again."),
    ("form_required_fields", "Please fill in all required fields."),
    ("form_invalid_values", "Some values are invalid."),
    // master data
    ("show_inactive", "Show inactive"),
    ("machine_type", "Type"),
    ("maintenance", "Maintenance mode"),
    ("start_maintenance", "Start maintenance"),
    ("end_maintenance", "End maintenance"),
    ("maintenance_on", "Machine switched to maintenance mode."),
    ("maintenance_off", "Machine is back in service."),
    ("all_roles", "All roles"),
    ("assigned_machines", "Assigned machines"),
    ("user_cannot_delete_self", "You cannot delete your own account."),
    ("ADMIN", "Administrator"),
    ("SUPERVISOR", "Supervisor"),
    ("OPERATOR", "Operator"),
    // dashboard
    ("active_tasks", "Active tasks"),
    ("total_records", "QC records"),
    ("pass_rate", "Pass rate"),
    ("pending_approvals", "Pending approvals"),
    ("weekly_trend", "Last 7 days"),
    ("machine_status", "Machine status"),
    ("product_performance", "Product performance"),
    ("critical_alerts", "Critical alerts"),
    ("recent_activity", "Recent activity"),
    ("no_pending", "No records are waiting for approval."),
    ("open_queue", "Open approval queue"),
    // templates
    ("new_template", "New template"),
    ("edit_template", "Edit template"),
    ("template_details", "Template details"),
    ("context_type", "Context"),
    ("control_points", "Control points"),
    ("version", "Version"),
    ("requires_approval", "Requires approval"),
    ("allow_partial_save", "Allow partial save"),
    ("label", "Label"),
    ("input_type", "Input"),
    ("unit", "Unit"),
    ("target", "Target"),
    ("min", "Min"),
    ("max", "Max"),
    ("samples", "Samples"),
    ("required", "Required"),
    ("options", "Options"),
    ("options_hint", "comma separated"),
    ("add_point", "Add control point"),
    ("template_saved", "Template saved."),
    ("template_no_points", "Add at least one control point."),
    ("template_point_label_required", "Every control point needs a label."),
    ("MACHINE", "Machine"),
    ("PRODUCT", "Product"),
    ("PROCESS", "Process"),
    ("GENERAL", "General"),
    ("NUMBER", "Number"),
    ("DECIMAL", "Decimal"),
    ("BOOLEAN", "OK / NOK"),
    ("YES_NO", "Yes / No"),
    ("PASS_FAIL", "Pass / Fail"),
    ("TEXT", "Text"),
    ("TEXTAREA", "Long text"),
    ("SELECT", "Choice"),
    ("MULTI_SELECT", "Multiple choice"),
    ("DATE", "Date"),
    ("TIME", "Time"),
    ("DATETIME", "Date and time"),
    ("PHOTO", "Photo"),
    ("SIGNATURE", "Signature"),
    // records
    ("record", "QC record"),
    ("values", "Measured values"),
    ("field", "Field"),
    ("value", "Value"),
    ("sample", "Sample"),
    ("notes", "Notes"),
    ("save_notes", "Save notes"),
    ("approve", "Approve"),
    ("reject", "Reject"),
    ("approved_by", "Approved by"),
    ("rejection_reason", "Rejection reason"),
    ("record_approved", "Record approved."),
    ("record_rejected", "Record rejected."),
    ("all_statuses", "All statuses"),
    ("auto_refresh", "Refreshes every"),
    ("col_code", "Code"),
    ("col_template", "Template"),
    ("col_subject", "Machine / asset"),
    ("col_filled_by", "Filled by"),
    ("col_result", "Result"),
    ("col_status", "Status"),
    ("col_date", "Date"),
    ("records_report_title", "QC records"),
    ("record_report_title", "QC record"),
    ("generated_at", "Generated at"),
    ("DRAFT", "Draft"),
    ("IN_PROGRESS", "In progress"),
    ("SUBMITTED", "Submitted"),
    ("APPROVED", "Approved"),
    ("REJECTED", "Rejected"),
    ("PASS", "Pass"),
    ("FAIL", "Fail"),
    ("WARNING", "Warning"),
    ("NA", "N/A"),
    ("PARTIAL", "Partial"),
    // operator
    ("hello", "Hello"),
    ("my_tasks", "My tasks"),
    ("my_drafts", "Unfinished entries"),
    ("no_tasks", "No tasks are assigned to you right now."),
    ("no_machines", "No machines are available."),
    ("start_entry", "Start"),
    ("choose_template", "Choose a form"),
    ("no_templates_for_machine", "No active forms for this machine."),
    ("task_early", "Not started"),
    ("task_active", "Open"),
    ("task_grace", "Grace period"),
    ("task_expired", "The time window of this task has closed."),
    ("machine_unavailable", "This machine is inactive or in maintenance."),
    ("draft_restored", "Your unsaved entries were restored."),
    ("draft_saved", "Draft saved."),
    ("draft_discarded", "Draft discarded."),
    ("save_draft", "Save draft"),
    ("submit", "Submit"),
    ("discard_draft", "Discard draft"),
    ("confirm_discard", "Discard all entered values?"),
    ("entry_missing_required", "Submitted with empty required fields"),
    ("submitted_late", "Submitted after the task window closed."),
    ("record_submitted", "Record submitted."),
    // settings
    ("profile", "Profile"),
    ("preferences", "Preferences"),
    ("language", "Language"),
    ("theme", "Theme"),
    ("theme_light", "Light"),
    ("theme_dark", "Dark"),
    ("sidebar", "Sidebar"),
    ("sidebar_expanded", "Expanded"),
    ("sidebar_collapsed", "Collapsed"),
    ("source", "Source"),
    // onboarding
    ("tour_dismiss", "Got it"),
    ("tour_dashboard", "The dashboard combines live QC metrics with the records waiting for your approval."),
    ("tour_templates", "Templates define the control points operators fill in. Use the builder to add rows."),
    ("tour_records", "Filter records by status or search, then export the list as CSV or PDF."),
    ("tour_approvals", "Submitted records appear here. Pick a result and approve or reject them."),
    ("tour_operator", "Start an assigned task or pick a machine to choose a form."),
    ("tour_entry", "Values are saved as a draft whenever you switch samples, so nothing is lost."),
];

const TR: &[(&str, &str)] = &[
    ("app_name", "Saphire KK"),
    ("nav_dashboard", "Gösterge paneli"),
    ("nav_companies", "Firmalar"),
    ("nav_locations", "Lokasyonlar"),
    ("nav_machines", "Makineler"),
    ("nav_products", "Ürünler"),
    ("nav_templates", "KK şablonları"),
    ("nav_records", "KK kayıtları"),
    ("nav_approvals", "Onaylar"),
    ("nav_users", "Kullanıcılar"),
    ("nav_logs", "Sistem kayıtları"),
    ("nav_operator", "Operatör"),
    ("nav_history", "Kayıtlarım"),
    ("nav_settings", "Ayarlar"),
    ("toggle_sidebar", "Kenar çubuğunu aç/kapat"),
    ("toggle_theme", "Temayı değiştir"),
    ("logout", "Çıkış"),
    ("login_title", "Giriş"),
    ("login_subtitle", "Kalite kontrol konsolu"),
    ("login_submit", "Giriş yap"),
    ("login_invalid_credentials", "Kullanıcı adı veya şifre hatalı."),
    ("session_expired", "Oturumunuzun süresi doldu. Lütfen tekrar giriş yapın."),
    ("not_allowed_title", "Erişim engellendi"),
    ("not_enough_rights", "Bu sayfayı açma yetkiniz yok."),
    ("back_home", "Başlangıç sayfasına git"),
    ("add", "Ekle"),
    ("edit", "Düzenle"),
    ("delete", "Sil"),
    ("save", "Kaydet"),
    ("remove", "Kaldır"),
    ("back", "Geri"),
    ("retry", "Tekrar dene"),
    ("search", "Ara…"),
    ("yes", "Evet"),
    ("no", "Hayır"),
    ("active", "Aktif"),
    ("inactive", "Pasif"),
    ("name", "Ad"),
    ("code", "Kod"),
    ("description", "Açıklama"),
    ("logo", "Logo adresi"),
    ("address", "Adres"),
    ("company", "Firma"),
    ("location", "Lokasyon"),
    ("machine", "Makine"),
    ("product", "Ürün"),
    ("username", "Kullanıcı adı"),
    ("password", "Şifre"),
    ("email", "E-posta"),
    ("full_name", "Ad soyad"),
    ("role", "Rol"),
    ("total", "Toplam"),
    ("no_data", "Henüz gösterilecek kayıt yok."),
    ("no_results", "Bu aramayla eşleşen kayıt yok."),
    ("confirm_delete", "Bu kayıt silinsin mi? Bu işlem geri alınamaz."),
    ("saved", "Kaydedildi."),
    ("deleted", "Silindi."),
    ("not_found", "İstenen kayıt artık mevcut değil."),
    ("error_title", "Bir sorun oluştu"),
    ("error_occurred", "Bir hata oluştu. Lütfen tekrar deneyin."),
    ("backend_unreachable", "KK sunucusuna ulaşılamıyor. Bağlantıyı kontrol edip tekrar deneyin."),
    ("form_required_fields", "Lütfen tüm zorunlu alanları doldurun."),
    ("form_invalid_values", "Bazı değerler geçersiz."),
    ("show_inactive", "Pasifleri göster"),
    ("machine_type", "Tip"),
    ("maintenance", "Bakım modu"),
    ("start_maintenance", "Bakımı başlat"),
    ("end_maintenance", "Bakımı bitir"),
    ("maintenance_on", "Makine bakım moduna alındı."),
    ("maintenance_off", "Makine yeniden hizmette."),
    ("all_roles", "Tüm roller"),
    ("assigned_machines", "Atanan makineler"),
    ("user_cannot_delete_self", "Kendi hesabınızı silemezsiniz."),
    ("ADMIN", "Yönetici"),
    ("SUPERVISOR", "Sorumlu"),
    ("OPERATOR", "Operatör"),
    ("active_tasks", "Aktif görevler"),
    ("total_records", "KK kayıtları"),
    ("pass_rate", "Başarı oranı"),
    ("pending_approvals", "Onay bekleyenler"),
    ("weekly_trend", "Son 7 gün"),
    ("machine_status", "Makine durumu"),
    ("product_performance", "Ürün performansı"),
    ("critical_alerts", "Kritik uyarılar"),
    ("recent_activity", "Son hareketler"),
    ("no_pending", "Onay bekleyen kayıt yok."),
    ("open_queue", "Onay kuyruğunu aç"),
    ("new_template", "Yeni şablon"),
    ("edit_template", "Şablonu düzenle"),
    ("template_details", "Şablon bilgileri"),
    ("context_type", "Bağlam"),
    ("control_points", "Kontrol noktaları"),
    ("version", "Sürüm"),
    ("requires_approval", "Onay gerektirir"),
    ("allow_partial_save", "Kısmi kayda izin ver"),
    ("label", "Etiket"),
    ("input_type", "Giriş"),
    ("unit", "Birim"),
    ("target", "Hedef"),
    ("min", "Min"),
    ("max", "Maks"),
    ("samples", "Numune"),
    ("required", "Zorunlu"),
    ("options", "Seçenekler"),
    ("options_hint", "virgülle ayırın"),
    ("add_point", "Kontrol noktası ekle"),
    ("template_saved", "Şablon kaydedildi."),
    ("template_no_points", "En az bir kontrol noktası ekleyin."),
    ("template_point_label_required", "Her kontrol noktasının bir etiketi olmalı."),
    ("MACHINE", "Makine"),
    ("PRODUCT", "Ürün"),
    ("PROCESS", "Proses"),
    ("GENERAL", "Genel"),
    ("NUMBER", "Sayı"),
    ("DECIMAL", "Ondalık"),
    ("BOOLEAN", "OK / NOK"),
    ("YES_NO", "Evet / Hayır"),
    ("PASS_FAIL", "Geçti / Kaldı"),
    ("TEXT", "Metin"),
    ("TEXTAREA", "Uzun metin"),
    ("SELECT", "Seçim"),
    ("MULTI_SELECT", "Çoklu seçim"),
    ("DATE", "Tarih"),
    ("TIME", "Saat"),
    ("DATETIME", "Tarih ve saat"),
    ("PHOTO", "Fotoğraf"),
    ("SIGNATURE", "İmza"),
    ("record", "KK kaydı"),
    ("values", "Ölçülen değerler"),
    ("field", "Alan"),
    ("value", "Değer"),
    ("sample", "Numune"),
    ("notes", "Notlar"),
    ("save_notes", "Notları kaydet"),
    ("approve", "Onayla"),
    ("reject", "Reddet"),
    ("approved_by", "Onaylayan"),
    ("rejection_reason", "Red nedeni"),
    ("record_approved", "Kayıt onaylandı."),
    ("record_rejected", "Kayıt reddedildi."),
    ("all_statuses", "Tüm durumlar"),
    ("auto_refresh", "Yenileme aralığı"),
    ("col_code", "Kod"),
    ("col_template", "Şablon"),
    ("col_subject", "Makine / varlık"),
    ("col_filled_by", "Dolduran"),
    ("col_result", "Sonuç"),
    ("col_status", "Durum"),
    ("col_date", "Tarih"),
    ("records_report_title", "KK kayıtları"),
    ("record_report_title", "KK kaydı"),
    ("generated_at", "Oluşturulma"),
    ("DRAFT", "Taslak"),
    ("IN_PROGRESS", "Devam ediyor"),
    ("SUBMITTED", "Gönderildi"),
    ("APPROVED", "Onaylandı"),
    ("REJECTED", "Reddedildi"),
    ("PASS", "Geçti"),
    ("FAIL", "Kaldı"),
    ("WARNING", "Uyarı"),
    ("NA", "Uygulanamaz"),
    ("PARTIAL", "Kısmi"),
    ("hello", "Merhaba"),
    ("my_tasks", "Görevlerim"),
    ("my_drafts", "Yarım kalan girişler"),
    ("no_tasks", "Şu anda size atanmış görev yok."),
    ("no_machines", "Kullanılabilir makine yok."),
    ("start_entry", "Başla"),
    ("choose_template", "Form seçin"),
    ("no_templates_for_machine", "Bu makine için aktif form yok."),
    ("task_early", "Başlamadı"),
    ("task_active", "Açık"),
    ("task_grace", "Ek süre"),
    ("task_expired", "Bu görevin zaman aralığı kapandı."),
    ("machine_unavailable", "Bu makine pasif veya bakımda."),
    ("draft_restored", "Kaydedilmemiş girişleriniz geri yüklendi."),
    ("draft_saved", "Taslak kaydedildi."),
    ("draft_discarded", "Taslak silindi."),
    ("save_draft", "Taslağı kaydet"),
    ("submit", "Gönder"),
    ("discard_draft", "Taslağı sil"),
    ("confirm_discard", "Girilen tüm değerler silinsin mi?"),
    ("entry_missing_required", "Boş zorunlu alanlarla gönderildi"),
    ("submitted_late", "Görev zaman aralığı kapandıktan sonra gönderildi."),
    ("record_submitted", "Kayıt gönderildi."),
    ("profile", "Profil"),
    ("preferences", "Tercihler"),
    ("language", "Dil"),
    ("theme", "Tema"),
    ("theme_light", "Açık"),
    ("theme_dark", "Koyu"),
    ("sidebar", "Kenar çubuğu"),
    ("sidebar_expanded", "Açık"),
    ("sidebar_collapsed", "Kapalı"),
    ("source", "Kaynak"),
    ("tour_dismiss", "Anladım"),
    ("tour_dashboard", "Panel, canlı KK göstergelerini ve onayınızı bekleyen kayıtları bir arada gösterir."),
    ("tour_templates", "Şablonlar operatörlerin dolduracağı kontrol noktalarını tanımlar. Satır eklemek için oluşturucuyu kullanın."),
    ("tour_records", "Kayıtları duruma göre filtreleyin veya arayın, ardından listeyi CSV ya da PDF olarak dışa aktarın."),
    ("tour_approvals", "Gönderilen kayıtlar burada listelenir. Bir sonuç seçip onaylayın veya reddedin."),
    ("tour_operator", "Atanmış bir görevi başlatın ya da form seçmek için bir makine seçin."),
    ("tour_entry", "Numune değiştirdiğinizde değerler taslak olarak saklanır, hiçbir giriş kaybolmaz."),
];

static CATALOGS: LazyLock<[Catalog; 2]> = LazyLock::new(|| {
    [
        EN.iter().copied().collect(),
        TR.iter().copied().collect(),
    ]
});

impl Language {
    /// Messages of this language keyed by catalog key.
    pub fn catalog(self) -> &'static Catalog {
        match self {
            Language::En => &CATALOGS[0],
            Language::Tr => &CATALOGS[1],
        }
    }
}

/// Catalog handed to templates as `t`.
pub fn catalog_map(lang: Language) -> &'static Catalog {
    lang.catalog()
}

/// Message for `key`, falling back to English and then to the key itself.
pub fn translate<'a>(lang: Language, key: &'a str) -> &'a str {
    lang.catalog()
        .get(key)
        .or_else(|| Language::En.catalog().get(key))
        .copied()
        .unwrap_or(key)
}
