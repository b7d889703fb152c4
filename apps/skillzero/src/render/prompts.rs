// Fixed text blocks of the per-participant prompt document.
// Placeholders are `{key}` and are filled in a single pass by `render::fill_placeholders`.

/// Shown for a profile field with no value.
pub const NOT_REGISTERED: &str = "未登録";

/// Shown for an unanswered survey question.
pub const NOT_ANSWERED: &str = "未回答";

/// Last line of every prompt document.
pub const PROMPT_END_MARKER: &str = "=== プロンプト終了 ===";

/// Profile section. Replace `{name}`, one key per profile field and `{work_history}`.
pub const PROFILE_SECTION_TEMPLATE: &str = "## プロフィール情報
**名前**: {name}

**職種・職業**: {job}

**自己紹介**: {bio}

**出身地**: {location}

**家族構成**: {family}

**リベ大との出会い**: {libecity_meeting}

**挑戦・実践**: {challenges}

**趣味・特技**: {hobbies}

**好きなこと**: {likes}

**スキル・資格**: {skills}

**詳細プロフィール**:
{work_history}";

/// Survey answer section. Question labels come from `FormQuestion::label`,
/// answers from the matching `{experience}`..`{weaknesses}` keys.
pub const FORM_SECTION_TEMPLATE: &str = "## フォーム回答データ
**{experience_label}**: {experience}

**{strengths_label}**: {strengths}

**{appreciation_label}**: {appreciation}

**{not_bad_at_label}**: {not_bad_at}

**{weaknesses_label}**: {weaknesses}";

/// Built-in event section, used unless an override file is configured.
pub const EVENT_INFO: &str = "## オフ会情報
【スキルゼロでもOK！】\"自分の得意\"が見つかる♪はじめの一歩オフ会
～ スキルゼロでもOK！一歩目を応援する気づきの場 ～

**開催概要**:
- 日時：7月13日（◯）10:00〜12:00
- 場所：新橋オフィス（参加無料）
- 定員：５名ほど（先着順・初参加歓迎！）

**対象となる方**:
・スキルや強みがまだ見えていない方
・何か始めたいけど、何からすればいいか迷っている方
・仲間やヒントを見つけたい方
・副業・スモールビジネスに興味がある方

**当日の内容**:
・かんたんな自己紹介（無理に話さなくてもOK）
・\"できることの種\"を見つけるワーク
・プチ相談＆体験談シェア
・先輩メンバーのリアルな話
・1人じゃ気づけなかった\"自分の強み\"と出会える時間

**参加特典**:
・初心者向け「スキルの棚卸しシート」配布
・ロクナナさんの\"リアル副業ストーリー\"トークあり";
